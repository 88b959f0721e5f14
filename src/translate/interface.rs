use async_trait::async_trait;

use crate::error::TranslateError;

/// Source language used when the caller does not name one
pub const AUTO_SOURCE_LANGUAGE: &str = "auto";

/// Translate interface - one backend, mocked or live
#[async_trait]
pub trait TranslateInterface: Send + Sync {
    /// Short name of the backend, reported by the health endpoint
    fn name(&self) -> &str;

    /// Target languages this backend accepts, or `None` when it has no
    /// fixed allow-list and leaves the decision to the remote service.
    fn supported_languages(&self) -> Option<&[&'static str]> {
        None
    }

    /// Translate `text` into `target_language`.
    ///
    /// # Arguments
    /// * `text` - Validated source text
    /// * `target_language` - Lowercase ISO 639-1 code
    /// * `source_language` - ISO 639-1 code or [`AUTO_SOURCE_LANGUAGE`]
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, TranslateError>;
}
