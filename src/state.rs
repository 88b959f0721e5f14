use std::sync::Arc;

use crate::config::Config;
use crate::log_store::RequestLogStore;
use crate::pipeline::TranslationPipeline;
use crate::translate::{TranslateFactory, TranslateInterface};
use crate::validation::Validator;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<TranslationPipeline>,
    pub log_store: Arc<RequestLogStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = TranslateFactory::create_translator(&config.provider)?;
        Ok(Self::with_translator(config, translator))
    }

    /// Build state around an already constructed translator, with a fresh log
    pub fn with_translator(config: Config, translator: Arc<dyn TranslateInterface>) -> Self {
        let log_store = Arc::new(RequestLogStore::new());
        let pipeline = Arc::new(TranslationPipeline::new(
            translator,
            log_store.clone(),
            Validator::new(&config.limits),
        ));

        Self {
            config,
            pipeline,
            log_store,
        }
    }
}
