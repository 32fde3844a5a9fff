//! Client for the local text-generation microservice (`POST /generate`)

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generated_text: String,
}

pub struct TextGenerator {
    base_url: String,
    max_new_tokens: u32,
    client: Client,
}

impl TextGenerator {
    pub fn new(base_url: &str, max_new_tokens: u32, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            max_new_tokens,
            client,
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let endpoint = format!("{}/generate", self.base_url);
        let response = self
            .client
            .post(endpoint)
            .json(&GenerateRequest {
                prompt,
                max_new_tokens: self.max_new_tokens,
            })
            .send()
            .await
            .context("failed to call text-generation service")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read text-generation response body")?;
        if !status.is_success() {
            return Err(anyhow!("text-generation service failed ({status}): {body}"));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).context("invalid text-generation response format")?;
        let text = clean(&parsed.generated_text);
        if text.is_empty() {
            return Err(anyhow!("text-generation service returned empty text"));
        }
        Ok(text)
    }
}

/// Strip quotes and surrounding whitespace the model tends to add
fn clean(raw: &str) -> String {
    raw.replace(['"', '“', '”'], "").trim().to_string()
}
