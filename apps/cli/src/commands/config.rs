//! `totem-quote config`

use std::path::Path;

use anyhow::anyhow;
use clap::Subcommand;

use totem_engine::EngineConfig;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML, credentials redacted
    Show,
    /// Print the config file location
    Path,
}

pub fn run(config: &EngineConfig, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show => {
            print!("{}", render_config(config)?);
            Ok(())
        }
        ConfigCommand::Path => print_path(None),
    }
}

/// Effective configuration with every secret replaced.
pub fn render_config(config: &EngineConfig) -> anyhow::Result<String> {
    Ok(config.redacted().to_toml()?)
}

pub fn print_path(explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => EngineConfig::default_config_path()
            .ok_or_else(|| anyhow!("no home directory to hold a config file"))?,
    };

    if path.exists() {
        println!("{}", path.display());
    } else {
        println!("{} (not created)", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_redacts_credentials() {
        let mut config = EngineConfig::default();
        config.geocoder.gemini.api_key = Some("AIza-secret".into());
        config.store.remote_url = Some("https://inventory.example.com".into());
        config.store.remote_key = Some("service-role-secret".into());

        let text = render_config(&config).unwrap();
        assert!(!text.contains("AIza-secret"));
        assert!(!text.contains("service-role-secret"));
        assert!(text.contains("<redacted>"));
        assert!(text.contains("https://inventory.example.com"));
    }

    #[test]
    fn test_show_output_parses_back() {
        let config = EngineConfig::default();
        let text = render_config(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.geocoder.provider, config.geocoder.provider);
    }
}
