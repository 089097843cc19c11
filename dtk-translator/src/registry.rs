use crate::FileTranslator;
use crate::pptx::PptxTranslator;
use dtk_core::{DtkError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type HandlerFactory = fn() -> Arc<dyn FileTranslator>;

/// Extension → format handler table; the single extension point for adding
/// formats (`docx`, `xlsx`, `pdf`, ...).
///
/// Handlers are constructed lazily on first use and cached; all per-job
/// state travels in the `TranslateContext`, so one handler instance serves
/// every job of its format.
pub struct TranslatorRegistry {
    known: HashMap<String, HandlerFactory>,
    instances: RwLock<HashMap<String, Arc<dyn FileTranslator>>>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self { known: HashMap::new(), instances: RwLock::new(HashMap::new()) }
    }

    /// Registry with the built-in formats registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("pptx", || Arc::new(PptxTranslator::new()));
        registry
    }

    /// Register a factory for `extension` (lowercase, without leading dot).
    pub fn register(&mut self, extension: &str, factory: HandlerFactory) {
        self.known.insert(extension.to_ascii_lowercase(), factory);
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.known.contains_key(&extension.to_ascii_lowercase())
    }

    /// Resolve the handler for a file extension.
    pub fn handler_for(&self, extension: &str) -> Result<Arc<dyn FileTranslator>> {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();

        if let Some(handler) = self.instances.read().unwrap().get(&key) {
            return Ok(handler.clone());
        }

        let factory = self
            .known
            .get(&key)
            .ok_or_else(|| DtkError::UnsupportedFormat(key.clone()))?;

        let handler = factory();
        self.instances.write().unwrap().insert(key, handler.clone());
        Ok(handler)
    }
}

impl Default for TranslatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pptx_is_registered_by_default() {
        let registry = TranslatorRegistry::with_defaults();
        assert!(registry.supports("pptx"));
        assert!(registry.handler_for("pptx").is_ok());
    }

    #[test]
    fn test_extension_is_case_insensitive_and_dot_tolerant() {
        let registry = TranslatorRegistry::with_defaults();
        assert!(registry.handler_for("PPTX").is_ok());
        assert!(registry.handler_for(".pptx").is_ok());
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let registry = TranslatorRegistry::with_defaults();
        let result = registry.handler_for("odt");
        assert!(matches!(result, Err(DtkError::UnsupportedFormat(ref ext)) if ext == "odt"));
    }

    #[test]
    fn test_handler_instance_is_cached() {
        let registry = TranslatorRegistry::with_defaults();
        let first = registry.handler_for("pptx").unwrap();
        let second = registry.handler_for("pptx").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
