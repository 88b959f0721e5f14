use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use super::{LiveTranslator, MockTranslator, TranslateInterface};
use crate::config::{ProviderConfig, ProviderKind};

/// Factory for creating the translation backend
pub struct TranslateFactory;

impl TranslateFactory {
    /// Create a translator based on configuration.
    ///
    /// The choice is made once at startup; every request then goes through
    /// the same backend.
    pub fn create_translator(config: &ProviderConfig) -> Result<Arc<dyn TranslateInterface>> {
        info!("Initializing translation provider: {:?}", config.kind);

        match config.kind {
            ProviderKind::Mock => Ok(Arc::new(MockTranslator::new())),
            ProviderKind::Live => {
                let base_url = config
                    .base_url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("Live provider requires provider.base_url"))?;
                Ok(Arc::new(LiveTranslator::new(
                    base_url,
                    config.api_key.clone(),
                    Duration::from_secs(config.timeout_secs),
                )?))
            }
        }
    }
}
