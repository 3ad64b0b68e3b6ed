//! Client for the generative summarization model.
//!
//! Wired into the router state as an optional collaborator; no route calls it
//! yet. Constructed only when a model is configured.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const VERTEX_API_BASE: &str = "https://aiplatform.googleapis.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum GenerativeError {
    #[error("generative backend request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("generative backend returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("generative backend returned no candidates")]
    EmptyResponse,
}

pub struct GenerativeClient {
    http: Client,
    base_url: String,
    project_id: String,
    location: String,
    model: String,
}

impl GenerativeClient {
    pub fn new(
        project_id: String,
        location: String,
        model: String,
    ) -> Result<Self, GenerativeError> {
        Self::with_base_url(VERTEX_API_BASE.to_string(), project_id, location, model)
    }

    /// Create a client against a custom base URL.
    /// Useful for testing with a stub backend.
    pub fn with_base_url(
        base_url: String,
        project_id: String,
        location: String,
        model: String,
    ) -> Result<Self, GenerativeError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url,
            project_id,
            location,
            model,
        })
    }

    fn model_path(&self) -> String {
        format!(
            "projects/{}/locations/{}/publishers/google/models/{}",
            self.project_id, self.location, self.model
        )
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, GenerativeError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model_path());
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.25,
                max_output_tokens: 1024,
            },
        };

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerativeError::Api { status, message });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(GenerativeError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_path_is_fully_qualified() {
        let client = GenerativeClient::new(
            "acme-support".to_string(),
            "us-central1".to_string(),
            "gemini-1.5-flash".to_string(),
        )
        .unwrap();

        assert_eq!(
            client.model_path(),
            "projects/acme-support/locations/us-central1/publishers/google/models/gemini-1.5-flash"
        );
    }

    #[test]
    fn generate_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: "summarize this".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.25,
                max_output_tokens: 1024,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [
                    { "role": "user", "parts": [ { "text": "summarize this" } ] }
                ],
                "generationConfig": { "temperature": 0.25, "maxOutputTokens": 1024 }
            })
        );
    }
}
