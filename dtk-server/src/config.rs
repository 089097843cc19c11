use dtk_cache::StatusCache;
use dtk_core::Llm;
use dtk_history::HistoryStore;
use dtk_translator::TranslatorRegistry;
use std::path::PathBuf;
use std::sync::Arc;

/// Uploaded files land here, relative to the temp dir.
const UPLOAD_FOLDER: &str = "translation/original";
/// Translated files are written here, relative to the temp dir.
const TRANSLATED_FOLDER: &str = "translation/translated";

/// Configuration for the DTK server.
#[derive(Clone)]
pub struct ServerConfig {
    pub llm: Arc<dyn Llm>,
    pub registry: Arc<TranslatorRegistry>,
    pub status_cache: Arc<dyn StatusCache>,
    pub history_store: Arc<dyn HistoryStore>,
    pub temp_dir: PathBuf,
}

impl ServerConfig {
    pub fn new(
        llm: Arc<dyn Llm>,
        status_cache: Arc<dyn StatusCache>,
        history_store: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            llm,
            registry: Arc::new(TranslatorRegistry::with_defaults()),
            status_cache,
            history_store,
            temp_dir: std::env::temp_dir(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<TranslatorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    pub(crate) fn upload_dir(&self) -> PathBuf {
        self.temp_dir.join(UPLOAD_FOLDER)
    }

    pub(crate) fn translated_dir(&self) -> PathBuf {
        self.temp_dir.join(TRANSLATED_FOLDER)
    }
}
