use std::sync::LazyLock;

use regex::Regex;

use crate::config::LimitsConfig;
use crate::error::{ValidationError, ValidationReason};
use crate::models::{BulkEntry, TranslationRequest};

/// ISO 639-1 codes: exactly two letters once lowercased
pub const LANGUAGE_CODE_LEN: usize = 2;

static LANGUAGE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}$").expect("language code pattern is valid"));

/// Enforces input constraints before a provider is ever called
#[derive(Debug, Clone)]
pub struct Validator {
    max_text_chars: usize,
    max_batch_items: usize,
}

impl Validator {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            max_text_chars: limits.max_text_chars,
            max_batch_items: limits.max_batch_items,
        }
    }

    /// Lowercase and trim a language code the same way validation does,
    /// so failed attempts are logged under the code the client meant.
    pub fn normalize_language(target_language: &str) -> String {
        target_language.trim().to_lowercase()
    }

    pub fn validate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<TranslationRequest, ValidationError> {
        let chars = text.chars().count();
        if chars == 0 {
            return Err(ValidationError::new(
                ValidationReason::Empty,
                "Text to translate must not be empty",
            ));
        }
        if chars > self.max_text_chars {
            return Err(ValidationError::new(
                ValidationReason::TooLong,
                format!(
                    "Text is {} characters long, maximum is {}",
                    chars, self.max_text_chars
                ),
            ));
        }

        let language = Self::normalize_language(target_language);
        if language.chars().count() != LANGUAGE_CODE_LEN {
            return Err(ValidationError::new(
                ValidationReason::BadLength,
                format!(
                    "Target language '{}' must be a {}-letter ISO 639-1 code",
                    language, LANGUAGE_CODE_LEN
                ),
            ));
        }
        if !LANGUAGE_CODE.is_match(&language) {
            return Err(ValidationError::new(
                ValidationReason::BadFormat,
                format!("Target language '{}' must contain only letters", language),
            ));
        }

        Ok(TranslationRequest::new_unchecked(text.to_string(), language))
    }

    /// Batch-wide constraints; a failure here rejects the whole batch.
    pub fn validate_batch_size(&self, len: usize) -> Result<(), ValidationError> {
        if len == 0 {
            return Err(ValidationError::new(
                ValidationReason::EmptyBatch,
                "Bulk request must contain at least one item",
            ));
        }
        if len > self.max_batch_items {
            return Err(ValidationError::new(
                ValidationReason::TooManyItems,
                format!(
                    "Bulk request has {} items, maximum is {}",
                    len, self.max_batch_items
                ),
            ));
        }
        Ok(())
    }

    /// Validate a bulk element, including fields the client left out or
    /// sent with the wrong JSON type.
    pub fn validate_entry(&self, entry: &BulkEntry) -> Result<TranslationRequest, ValidationError> {
        let text = entry.text.as_deref().ok_or_else(|| {
            ValidationError::new(
                ValidationReason::Missing,
                "Field 'text' is missing or not a string",
            )
        })?;
        let target_language = entry.target_language.as_deref().ok_or_else(|| {
            ValidationError::new(
                ValidationReason::Missing,
                "Field 'targetLanguage' is missing or not a string",
            )
        })?;
        self.validate(text, target_language)
    }

    /// Validate every item independently; one bad item never hides the
    /// outcome of its siblings.
    pub fn validate_batch(
        &self,
        items: &[BulkEntry],
    ) -> Vec<Result<TranslationRequest, ValidationError>> {
        items.iter().map(|item| self.validate_entry(item)).collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}
