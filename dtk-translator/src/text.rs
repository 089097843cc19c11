use crate::prompts;
use dtk_core::{Language, Llm, Result};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

/// Inputs that pass through untranslated: plain hyphen, katakana-hiragana
/// prolonged sound mark, and the unambiguous hyphen glyph.
const PASSTHROUGH_GLYPHS: [&str; 3] = ["-", "ー", "‐"];

/// Text translation over the chat capability.
///
/// Holds the language pair and keyword map for one job; every text unit of
/// the job goes through [`TextTranslator::translate`].
pub struct TextTranslator {
    source_language: Language,
    target_language: Language,
    keywords_map: IndexMap<String, String>,
    llm: Arc<dyn Llm>,
}

impl TextTranslator {
    pub fn new(
        source_language: Language,
        target_language: Language,
        keywords_map: Option<IndexMap<String, String>>,
        llm: Arc<dyn Llm>,
    ) -> Self {
        let keywords_map = keywords_map.unwrap_or_default();
        debug!(
            source = %source_language,
            target = %target_language,
            keywords = keywords_map.len(),
            model = llm.name(),
            "translator initialized"
        );
        Self { source_language, target_language, keywords_map, llm }
    }

    pub fn source_language(&self) -> Language {
        self.source_language
    }

    pub fn target_language(&self) -> Language {
        self.target_language
    }

    /// Translate one text unit. Empty input yields `""`; dash glyphs pass
    /// through without a model call; everything else is prompted through the
    /// chat capability.
    pub async fn translate(&self, input_text: &str) -> Result<String> {
        if input_text.trim().is_empty() {
            return Ok(String::new());
        }
        if PASSTHROUGH_GLYPHS.contains(&input_text) {
            return Ok(input_text.to_string());
        }

        let req = prompts::simple_translate(
            self.source_language,
            self.target_language,
            &self.keywords_map,
            input_text,
        );
        let response = self.llm.complete(req).await?;
        debug!(input_len = input_text.len(), output_len = response.len(), "translated text unit");
        Ok(response)
    }
}
