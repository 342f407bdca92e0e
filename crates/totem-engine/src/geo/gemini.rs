//! # Gemini Provider
//!
//! Geocoding through a schema-constrained Gemini `generateContent` call.
//!
//! ```text
//!   POST {base}/models/{model}:generateContent?key=<api key>
//!   {
//!     "contents": [{"role": "user", "parts": [{"text": "<prompt>"}]}],
//!     "generationConfig": {
//!       "temperature": 0,
//!       "responseMimeType": "application/json",
//!       "responseSchema": {"type": "OBJECT", "properties": {lat, lon, region}}
//!     }
//!   }
//!   ◄── {"candidates": [{"content": {"parts": [{"text": "{\"lat\":45.07,...}"}]}}]}
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::{checked_coordinates, italy_query, GeoResolver, GeocodedPlace};
use crate::error::{GeoError, GeoResult};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// The JSON object the response schema forces the model to produce.
#[derive(Debug, Deserialize)]
struct PlaceAnswer {
    lat: f64,
    lon: f64,
    #[serde(default)]
    region: Option<String>,
}

fn generation_config() -> Value {
    json!({
        "temperature": 0,
        "responseMimeType": "application/json",
        "responseSchema": {
            "type": "OBJECT",
            "properties": {
                "lat": {"type": "NUMBER", "description": "Latitude in decimal degrees"},
                "lon": {"type": "NUMBER", "description": "Longitude in decimal degrees"},
                "region": {"type": "STRING", "description": "Italian administrative region"}
            },
            "required": ["lat", "lon", "region"]
        }
    })
}

fn prompt(city: &str) -> String {
    format!(
        "Geocode the place \"{}\". Reply with its latitude and longitude in decimal \
         degrees and the name of the Italian region (regione) it belongs to.",
        italy_query(city)
    )
}

// =============================================================================
// Resolver
// =============================================================================

/// Gemini-backed geocoder.
#[derive(Debug, Clone)]
pub struct GeminiResolver {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiResolver {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> GeoResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeoError::Network(e.to_string()))?;

        Ok(GeminiResolver {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl GeoResolver for GeminiResolver {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    async fn geocode(&self, city: &str) -> GeoResult<GeocodedPlace> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, city = %city, "Gemini geocode");

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt(city) }],
            }],
            generation_config: generation_config(),
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status, "Gemini request failed");
            return Err(GeoError::Status { status, body });
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GeoError::NoResults {
                query: italy_query(city),
            })?;

        let answer: PlaceAnswer = serde_json::from_str(text.trim())?;
        Ok(GeocodedPlace {
            coordinates: checked_coordinates(answer.lat, answer.lon)?,
            region: answer.region.filter(|region| !region.trim().is_empty()),
            display_name: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(server: &MockServer) -> GeminiResolver {
        GeminiResolver::new(
            &server.uri(),
            "gemini-2.5-flash",
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn answer(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_structured_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer(
                r#"{"lat": 40.8518, "lon": 14.2681, "region": "Campania"}"#,
            )))
            .mount(&server)
            .await;

        let resolved = resolver(&server).resolve_city("Napoli").await.unwrap();
        assert_eq!(resolved.region, "Campania");
        assert!((resolved.coordinates.lon - 14.2681).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let err = resolver(&server).geocode("Napoli").await.unwrap_err();
        assert!(matches!(err, GeoError::NoResults { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("Naples is in Campania")))
            .mount(&server)
            .await;

        let err = resolver(&server).geocode("Napoli").await.unwrap_err();
        assert!(matches!(err, GeoError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_blank_region_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer(
                r#"{"lat": 40.85, "lon": 14.27, "region": ""}"#,
            )))
            .mount(&server)
            .await;

        let place = resolver(&server).geocode("Napoli").await.unwrap();
        assert!(place.region.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = resolver(&server).geocode("Napoli").await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_prompt_mentions_italy() {
        assert!(prompt(" Matera ").contains("\"Matera, Italy\""));
    }
}
