use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{TranslateError, ValidationError};
use crate::log_store::RequestLogStore;
use crate::models::{BulkEntry, BulkItem, LogRecord, TranslationRequest, TranslationResult};
use crate::translate::{TranslateInterface, AUTO_SOURCE_LANGUAGE};
use crate::validation::Validator;

const ABORTED_MESSAGE: &str = "Translation attempt aborted before completion";

/// Appends exactly one log entry for a translation attempt when dropped.
///
/// An attempt that is never resolved (panic, cancelled future) is logged as
/// an error.
struct AttemptLog<'a> {
    store: &'a RequestLogStore,
    source_text: String,
    target_language: String,
    outcome: Option<Result<String, String>>,
}

impl<'a> AttemptLog<'a> {
    fn open(store: &'a RequestLogStore, source_text: &str, target_language: &str) -> Self {
        Self {
            store,
            source_text: source_text.to_string(),
            target_language: target_language.to_string(),
            outcome: None,
        }
    }

    fn resolve(&mut self, outcome: &Result<TranslationResult, TranslateError>) {
        self.outcome = Some(match outcome {
            Ok(result) => Ok(result.translated_text.clone()),
            Err(err) => Err(err.to_string()),
        });
    }
}

impl Drop for AttemptLog<'_> {
    fn drop(&mut self) {
        let source_text = std::mem::take(&mut self.source_text);
        let target_language = std::mem::take(&mut self.target_language);
        let record = match self.outcome.take() {
            Some(Ok(translated)) => LogRecord::success(source_text, target_language, translated),
            Some(Err(message)) => LogRecord::error(source_text, target_language, message),
            None => LogRecord::error(source_text, target_language, ABORTED_MESSAGE.to_string()),
        };
        self.store.append(record);
    }
}

/// Validation, provider call and logging for single and bulk translations
pub struct TranslationPipeline {
    translator: Arc<dyn TranslateInterface>,
    log_store: Arc<RequestLogStore>,
    validator: Validator,
}

impl TranslationPipeline {
    pub fn new(
        translator: Arc<dyn TranslateInterface>,
        log_store: Arc<RequestLogStore>,
        validator: Validator,
    ) -> Self {
        info!("Translation pipeline using provider '{}'", translator.name());
        Self {
            translator,
            log_store,
            validator,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.translator.name()
    }

    /// Translate one block of text. Exactly one log entry is appended
    /// whatever the outcome, and errors are returned unchanged.
    pub async fn translate_one(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<TranslationResult, TranslateError> {
        let validation = self.validator.validate(text, target_language);
        self.attempt(text, target_language, validation).await
    }

    /// Translate a batch item by item, in input order.
    ///
    /// Only batch-wide constraints fail the call, and such a rejection is
    /// logged as one batch-level entry. A failing item is logged and
    /// reported in-band at its position so the rest of the batch is still
    /// translated.
    pub async fn translate_bulk(
        &self,
        items: &[BulkEntry],
    ) -> Result<Vec<BulkItem>, TranslateError> {
        if let Err(err) = self.validator.validate_batch_size(items.len()) {
            warn!("Bulk request rejected ({}): {}", err.reason, err);
            self.log_store.append(LogRecord::error(
                format!("Bulk request for {} items", items.len()),
                shared_language(items),
                err.to_string(),
            ));
            return Err(err.into());
        }
        let validated = self.validator.validate_batch(items);

        let mut results = Vec::with_capacity(items.len());
        for (item, validation) in items.iter().zip(validated) {
            let target_language = item.target_language.as_deref().unwrap_or_default();
            let outcome = self
                .attempt(item.source_text(), target_language, validation)
                .await;

            results.push(match outcome {
                Ok(result) => BulkItem::Translated(result),
                Err(error) => BulkItem::Failed {
                    source_text: item.source_text().to_string(),
                    target_language: Validator::normalize_language(target_language),
                    error,
                },
            });
        }

        let failed = results.iter().filter(|item| !item.is_success()).count();
        info!(
            "Bulk translation finished: {} items, {} failed",
            results.len(),
            failed
        );
        Ok(results)
    }

    async fn attempt(
        &self,
        text: &str,
        target_language: &str,
        validation: Result<TranslationRequest, ValidationError>,
    ) -> Result<TranslationResult, TranslateError> {
        let mut log = AttemptLog::open(
            &self.log_store,
            text,
            &Validator::normalize_language(target_language),
        );

        let outcome = match validation {
            Ok(request) => self.call_provider(&request).await,
            Err(err) => Err(err.into()),
        };

        if let Err(err) = &outcome {
            warn!("Translation failed ({}): {}", err.kind(), err);
        }
        log.resolve(&outcome);
        outcome
    }

    async fn call_provider(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslateError> {
        let target_language = request.target_language();

        if let Some(supported) = self.translator.supported_languages() {
            if !supported.iter().any(|lang| *lang == target_language) {
                return Err(TranslateError::UnsupportedLanguage(target_language.to_string()));
            }
        }

        let translated_text = self
            .translator
            .translate(request.text(), target_language, AUTO_SOURCE_LANGUAGE)
            .await?;

        debug!("Translated {} chars into {}", request.text().chars().count(), target_language);
        Ok(TranslationResult {
            source_text: request.text().to_string(),
            translated_text,
            target_language: target_language.to_string(),
        })
    }
}

/// Target language every item agrees on, or empty when they differ
fn shared_language(items: &[BulkEntry]) -> String {
    let mut languages = items.iter().map(|item| {
        Validator::normalize_language(item.target_language.as_deref().unwrap_or_default())
    });
    match languages.next() {
        Some(first) if languages.all(|lang| lang == first) => first,
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationReason;
    use crate::models::LogStatus;
    use crate::translate::MockTranslator;
    use async_trait::async_trait;
    use std::time::Duration;

    fn mock_pipeline() -> (TranslationPipeline, Arc<RequestLogStore>) {
        let store = Arc::new(RequestLogStore::new());
        let pipeline = TranslationPipeline::new(
            Arc::new(MockTranslator::new()),
            store.clone(),
            Validator::default(),
        );
        (pipeline, store)
    }

    fn item(text: &str, lang: &str) -> BulkEntry {
        BulkEntry::new(text, lang)
    }

    enum Behavior {
        Fail(TranslateError),
        Hang,
        Panic,
    }

    struct StubTranslator(Behavior);

    #[async_trait]
    impl TranslateInterface for StubTranslator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn translate(
            &self,
            _text: &str,
            _target_language: &str,
            _source_language: &str,
        ) -> Result<String, TranslateError> {
            match &self.0 {
                Behavior::Fail(err) => Err(err.clone()),
                Behavior::Hang => std::future::pending().await,
                Behavior::Panic => panic!("provider blew up"),
            }
        }
    }

    fn stub_pipeline(behavior: Behavior) -> (Arc<TranslationPipeline>, Arc<RequestLogStore>) {
        let store = Arc::new(RequestLogStore::new());
        let pipeline = TranslationPipeline::new(
            Arc::new(StubTranslator(behavior)),
            store.clone(),
            Validator::default(),
        );
        (Arc::new(pipeline), store)
    }

    #[tokio::test]
    async fn success_appends_one_success_entry() {
        let (pipeline, store) = mock_pipeline();

        let result = pipeline.translate_one("Hello", "ta").await.unwrap();
        assert_eq!(result.translated_text, "வணக்கம்");
        assert_eq!(result.source_text, "Hello");
        assert_eq!(result.target_language, "ta");

        let logs = store.list_all();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Success);
        assert_eq!(logs[0].translated_text.as_deref(), Some("வணக்கம்"));
        assert!(logs[0].error_message.is_none());
    }

    #[tokio::test]
    async fn every_supported_language_succeeds() {
        let (pipeline, store) = mock_pipeline();
        for lang in ["ta", "hi", "kn", "bn"] {
            pipeline.translate_one("Good morning", lang).await.unwrap();
        }
        let logs = store.list_all();
        assert_eq!(logs.len(), 4);
        assert!(logs.iter().all(|e| e.status == LogStatus::Success));
    }

    #[tokio::test]
    async fn unsupported_language_appends_one_error_entry() {
        let (pipeline, store) = mock_pipeline();

        let err = pipeline.translate_one("Hello", "FR").await.unwrap_err();
        assert_eq!(err, TranslateError::UnsupportedLanguage("fr".to_string()));

        let logs = store.list_all();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Error);
        assert_eq!(logs[0].target_language, "fr");
        assert_eq!(
            logs[0].error_message.as_deref(),
            Some("Target language 'fr' is not supported")
        );
    }

    #[tokio::test]
    async fn validation_failure_is_logged_and_returned() {
        let (pipeline, store) = mock_pipeline();

        let err = pipeline.translate_one(&"x".repeat(1001), "ta").await.unwrap_err();
        match err {
            TranslateError::Validation(v) => assert_eq!(v.reason, ValidationReason::TooLong),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.list_all()[0].status, LogStatus::Error);
    }

    #[tokio::test]
    async fn repeated_translation_is_idempotent() {
        let (pipeline, _store) = mock_pipeline();
        let first = pipeline.translate_one("Hello", "hi").await.unwrap();
        let second = pipeline.translate_one("Hello", "hi").await.unwrap();
        assert_eq!(first.translated_text, second.translated_text);
    }

    #[tokio::test]
    async fn provider_error_propagates_unchanged() {
        let unavailable = TranslateError::ServiceUnavailable("connection refused".to_string());
        let (pipeline, store) = stub_pipeline(Behavior::Fail(unavailable.clone()));

        let err = pipeline.translate_one("Hello", "es").await.unwrap_err();
        assert_eq!(err, unavailable);

        let logs = store.list_all();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].error_message.as_deref(), Some(unavailable.to_string().as_str()));
    }

    #[tokio::test]
    async fn cancelled_attempt_is_still_logged() {
        let (pipeline, store) = stub_pipeline(Behavior::Hang);

        let timed_out = tokio::time::timeout(
            Duration::from_millis(50),
            pipeline.translate_one("Hello", "es"),
        )
        .await;
        assert!(timed_out.is_err());

        let logs = store.list_all();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Error);
        assert_eq!(logs[0].error_message.as_deref(), Some(ABORTED_MESSAGE));
    }

    #[tokio::test]
    async fn panicking_provider_is_still_logged() {
        let (pipeline, store) = stub_pipeline(Behavior::Panic);

        let handle = tokio::spawn(async move { pipeline.translate_one("Hello", "es").await });
        assert!(handle.await.unwrap_err().is_panic());

        assert_eq!(store.len(), 1);
        assert_eq!(store.list_all()[0].status, LogStatus::Error);
    }

    #[tokio::test]
    async fn bulk_keeps_partial_results() {
        let (pipeline, store) = mock_pipeline();
        let items = vec![item("Hello", "ta"), item("Thank you", "fr"), item("Good morning", "hi")];

        let results = pipeline.translate_bulk(&items).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert!(!results[1].is_success());
        assert!(results[2].is_success());

        let wire: Vec<_> = results.into_iter().map(BulkItem::into_result).collect();
        assert_eq!(wire[0].translated_text, "வணக்கம்");
        assert_eq!(
            wire[1].translated_text,
            "ERROR: Target language 'fr' is not supported"
        );
        assert_eq!(wire[2].translated_text, "सुप्रभात");

        let logs = store.list_all();
        assert_eq!(logs.len(), 3);
        let statuses: Vec<_> = logs.iter().map(|e| e.status).collect();
        assert_eq!(statuses, [LogStatus::Success, LogStatus::Error, LogStatus::Success]);
        let texts: Vec<_> = logs.iter().map(|e| e.source_text.as_str()).collect();
        assert_eq!(texts, ["Hello", "Thank you", "Good morning"]);
    }

    #[tokio::test]
    async fn bulk_reports_invalid_items_in_band() {
        let (pipeline, store) = mock_pipeline();
        let items = vec![item("", "ta"), item("Hello", "tamil"), item("Hello", "KN")];

        let results = pipeline.translate_bulk(&items).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(matches!(
            &results[0],
            BulkItem::Failed { error: TranslateError::Validation(v), .. } if v.reason == ValidationReason::Empty
        ));
        assert!(matches!(
            &results[1],
            BulkItem::Failed { error: TranslateError::Validation(v), .. } if v.reason == ValidationReason::BadLength
        ));
        assert!(results[2].is_success());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn bulk_item_without_text_fails_alone() {
        let (pipeline, store) = mock_pipeline();
        let items = vec![
            item("Hello", "ta"),
            BulkEntry {
                text: None,
                target_language: Some("ta".to_string()),
            },
            item("Thank you", "hi"),
        ];

        let results = pipeline.translate_bulk(&items).await.unwrap();
        assert!(results[0].is_success());
        assert!(matches!(
            &results[1],
            BulkItem::Failed { source_text, error: TranslateError::Validation(v), .. }
                if v.reason == ValidationReason::Missing && source_text.is_empty()
        ));
        assert!(results[2].is_success());

        let logs = store.list_all();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[1].status, LogStatus::Error);
        assert_eq!(logs[1].target_language, "ta");
    }

    #[tokio::test]
    async fn empty_bulk_is_rejected_with_one_log_entry() {
        let (pipeline, store) = mock_pipeline();

        let err = pipeline.translate_bulk(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Validation(ref v) if v.reason == ValidationReason::EmptyBatch
        ));

        let logs = store.list_all();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Error);
        assert_eq!(logs[0].source_text, "Bulk request for 0 items");
        assert_eq!(logs[0].target_language, "");
        assert_eq!(logs[0].error_message.as_deref(), Some(err.to_string().as_str()));
    }

    #[tokio::test]
    async fn oversized_bulk_is_rejected_with_one_log_entry() {
        let store = Arc::new(RequestLogStore::new());
        let pipeline = TranslationPipeline::new(
            Arc::new(MockTranslator::new()),
            store.clone(),
            Validator::new(&crate::config::LimitsConfig {
                max_text_chars: 1000,
                max_batch_items: 2,
            }),
        );
        let items = vec![item("Hello", "ta"), item("Thank you", " TA"), item("Good morning", "ta")];

        let err = pipeline.translate_bulk(&items).await.unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Validation(ref v) if v.reason == ValidationReason::TooManyItems
        ));

        let logs = store.list_all();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].source_text, "Bulk request for 3 items");
        assert_eq!(logs[0].target_language, "ta");
        assert_eq!(
            logs[0].error_message.as_deref(),
            Some("Bulk request has 3 items, maximum is 2")
        );
    }

    #[test]
    fn shared_language_is_empty_when_items_disagree() {
        assert_eq!(shared_language(&[item("a", "ta"), item("b", "hi")]), "");
        assert_eq!(shared_language(&[item("a", "HI"), item("b", "hi ")]), "hi");
        assert_eq!(shared_language(&[]), "");
    }
}
