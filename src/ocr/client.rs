//! Client for a vision model served by Ollama.

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Model inference on a phone screenshot can take a while on CPU.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Something that turns a screenshot into the model's JSON reply.
pub trait TextReader {
    fn read_text(&self, image_path: &Path) -> Result<Value>;
}

pub struct OllamaClient {
    host: String,
    model: String,
    http: reqwest::blocking::Client,
}

impl OllamaClient {
    pub fn new(host: &str, model: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }
}

impl TextReader for OllamaClient {
    /// Sends one image to the model and returns the raw JSON reply.
    fn read_text(&self, image_path: &Path) -> Result<Value> {
        let image = fs::read(image_path)
            .context(format!("Failed to read image: {}", image_path.display()))?;
        let body = chat_request(&self.model, &image);

        let response = self
            .http
            .post(self.chat_url())
            .json(&body)
            .send()
            .context(format!("Failed to reach OCR model at {}", self.host))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(anyhow!("OCR model returned {}: {}", status, text));
        }

        response
            .json::<Value>()
            .context("Failed to decode OCR model reply")
    }
}

/// Builds a non-streaming chat request with a single image-only user message.
pub fn chat_request(model: &str, image: &[u8]) -> Value {
    json!({
        "model": model,
        "stream": false,
        "messages": [{
            "role": "user",
            "content": "",
            "images": [STANDARD.encode(image)],
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let body = chat_request("glm-ocr", b"\x89PNG");

        assert_eq!(body["model"], "glm-ocr");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["images"][0], "iVBORw==");
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", "glm-ocr").unwrap();
        assert_eq!(client.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(client.model(), "glm-ocr");
    }
}
