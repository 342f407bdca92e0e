//! # totem-quote Entry Point
//!
//! ```text
//!   main.rs ────► runtime + exit code
//!   lib.rs ─────► argument parsing, logging, dispatch
//!   commands/ ──► quote, inventory, config
//! ```

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The actual setup is in lib.rs for testability
    totem_cli::run().await
}
