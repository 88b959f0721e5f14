use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::TranslateError;

/// A translation request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    target_language: String,
}

impl TranslationRequest {
    /// Only the validator builds these, so the invariants on text length and
    /// language code always hold for a value of this type.
    pub(crate) fn new_unchecked(text: String, target_language: String) -> Self {
        Self {
            text,
            target_language,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }
}

/// Successful translation, also the shape of every item in a bulk response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub source_text: String,
    pub translated_text: String,
    pub target_language: String,
}

/// Outcome of one item of a bulk translation, in input position
#[derive(Debug, Clone, PartialEq)]
pub enum BulkItem {
    Translated(TranslationResult),
    Failed {
        source_text: String,
        target_language: String,
        error: TranslateError,
    },
}

impl BulkItem {
    pub fn is_success(&self) -> bool {
        matches!(self, BulkItem::Translated(_))
    }

    /// Wire form: failures are reported in-band through an `ERROR:` marker
    pub fn into_result(self) -> TranslationResult {
        match self {
            BulkItem::Translated(result) => result,
            BulkItem::Failed {
                source_text,
                target_language,
                error,
            } => TranslationResult {
                source_text,
                translated_text: format!("ERROR: {}", error),
                target_language,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Error,
}

/// Everything about an attempt except its identity and time, which the
/// log store assigns when the record is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub source_text: String,
    pub target_language: String,
    pub translated_text: Option<String>,
    pub status: LogStatus,
    pub error_message: Option<String>,
}

impl LogRecord {
    pub fn success(source_text: String, target_language: String, translated_text: String) -> Self {
        Self {
            source_text,
            target_language,
            translated_text: Some(translated_text),
            status: LogStatus::Success,
            error_message: None,
        }
    }

    pub fn error(source_text: String, target_language: String, message: String) -> Self {
        Self {
            source_text,
            target_language,
            translated_text: None,
            status: LogStatus::Error,
            error_message: Some(message),
        }
    }
}

/// One immutable audit record of a translation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub source_text: String,
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    pub status: LogStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl LogEntry {
    pub(crate) fn from_record(record: LogRecord, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            source_text: record.source_text,
            target_language: record.target_language,
            translated_text: record.translated_text,
            status: record.status,
            error_message: record.error_message,
        }
    }
}

/// Body of `POST /translate`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatePayload {
    pub text: String,
    #[serde(alias = "target_language")]
    pub target_language: String,
}

/// One element of a bulk request as the client sent it.
///
/// Fields that are missing or not strings come through as `None` so the
/// item can be rejected on its own instead of failing the whole body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkEntry {
    pub text: Option<String>,
    pub target_language: Option<String>,
}

impl BulkEntry {
    #[cfg(test)]
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            target_language: Some(target_language.into()),
        }
    }

    fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            text: field("text"),
            target_language: field("targetLanguage").or_else(|| field("target_language")),
        }
    }

    /// Source text as logged and echoed back, empty when absent
    pub fn source_text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// Body of `POST /translate/bulk`.
///
/// Accepts the per-item shape as well as the older shared-language shape,
/// which is expanded into per-item form before processing. Elements are
/// kept as raw JSON so one malformed item cannot reject its siblings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BulkTranslatePayload {
    Items {
        requests: Vec<Value>,
    },
    Sentences {
        sentences: Vec<Value>,
        #[serde(rename = "targetLanguage", alias = "target_language")]
        target_language: String,
    },
}

impl BulkTranslatePayload {
    pub fn into_items(self) -> Vec<BulkEntry> {
        match self {
            BulkTranslatePayload::Items { requests } => {
                requests.iter().map(BulkEntry::from_value).collect()
            }
            BulkTranslatePayload::Sentences {
                sentences,
                target_language,
            } => sentences
                .iter()
                .map(|sentence| BulkEntry {
                    text: sentence.as_str().map(str::to_string),
                    target_language: Some(target_language.clone()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkTranslationResponse {
    pub results: Vec<TranslationResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    pub request_logs: Vec<LogEntry>,
}
