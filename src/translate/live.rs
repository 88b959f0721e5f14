use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::interface::TranslateInterface;
use crate::error::TranslateError;

/// Longest slice of an unexpected response body quoted in error messages
const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct LibreResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    error: Option<serde_json::Value>,
}

/// Client for a LibreTranslate compatible HTTP endpoint
#[derive(Debug, Clone)]
pub struct LiveTranslator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl LiveTranslator {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        info!(
            "Initialized LiveTranslator: base_url={}, timeout={:?}",
            base_url, timeout
        );
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn map_send_error(err: reqwest::Error) -> TranslateError {
        if err.is_timeout() {
            TranslateError::ServiceUnavailable(format!("request timed out: {}", err))
        } else if err.is_connect() || err.is_request() {
            TranslateError::ServiceUnavailable(err.to_string())
        } else {
            TranslateError::Internal(err.to_string())
        }
    }

    fn excerpt(body: &str) -> String {
        let trimmed = body.trim();
        if trimmed.chars().count() > BODY_EXCERPT_CHARS {
            let cut: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
            format!("{}...", cut)
        } else {
            trimmed.to_string()
        }
    }

    /// Turn a raw HTTP status and body into translated text or a typed error
    fn interpret(status: reqwest::StatusCode, body: &str) -> Result<String, TranslateError> {
        let parsed = serde_json::from_str::<LibreResponse>(body).ok();

        if let Some(details) = parsed.as_ref().and_then(|p| p.error.as_ref()) {
            let details = match details {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(TranslateError::Upstream { details });
        }

        if !status.is_success() {
            return Err(TranslateError::BadResponse(format!(
                "HTTP {}: {}",
                status,
                Self::excerpt(body)
            )));
        }

        let parsed = parsed.ok_or_else(|| {
            if body.trim().is_empty() {
                TranslateError::BadResponse("empty response body".to_string())
            } else {
                TranslateError::BadResponse(format!(
                    "response is not valid JSON: {}",
                    Self::excerpt(body)
                ))
            }
        })?;

        match parsed.translated_text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(TranslateError::BadResponse(
                "response has no translatedText".to_string(),
            )),
        }
    }
}

#[async_trait]
impl TranslateInterface for LiveTranslator {
    fn name(&self) -> &str {
        "live"
    }

    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, TranslateError> {
        let url = format!("{}/translate", self.base_url);
        let request = LibreRequest {
            q: text,
            source: source_language,
            target: target_language,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        debug!("Sending translate request to {} ({} -> {})", url, source_language, target_language);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let err = Self::map_send_error(e);
                warn!("Translation request to {} failed: {}", url, err);
                err
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TranslateError::ServiceUnavailable(format!("response timed out: {}", e))
            } else {
                TranslateError::BadResponse(format!("failed to read response body: {}", e))
            }
        })?;

        Self::interpret(status, &body).map_err(|err| {
            error!("Translation service returned an error ({}): {}", status, err);
            err
        })
    }
}
