//! OCR model output as stored in `response.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Reply from the chat endpoint. Only `message.content` is used; any other
/// fields the model returns are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrResponse {
    pub model: String,
    pub message: OcrMessage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrMessage {
    pub role: String,
    pub content: String,
}

impl OcrResponse {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read OCR response: {}", path.display()))?;
        Self::from_json(&content)
            .context(format!("Failed to parse OCR response: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.message.content.is_empty()
    }

    /// Text split on `\n`. Blank lines are kept so line positions match
    /// the raw output.
    pub fn lines(&self) -> Vec<&str> {
        self.message.content.split('\n').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_ollama_reply() {
        let json = r#"{
            "model": "glm-ocr",
            "created_at": "2025-11-02T10:00:00Z",
            "message": {"role": "assistant", "content": "09:14\nTango #482\n\n1:45"},
            "done": true
        }"#;
        let response = OcrResponse::from_json(json).unwrap();

        assert_eq!(response.model, "glm-ocr");
        assert_eq!(response.lines(), vec!["09:14", "Tango #482", "", "1:45"]);
        assert!(!response.is_empty());
    }

    #[test]
    fn test_missing_message_is_empty() {
        let response = OcrResponse::from_json(r#"{"done": true}"#).unwrap();
        assert!(response.is_empty());
        assert_eq!(response.lines(), vec![""]);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(OcrResponse::from_file(file.path()).is_err());
    }
}
