use dtk_core::{CompletionRequest, Language};
use indexmap::IndexMap;

/// System instructions for the translation prompt. The keywords-map contract
/// is spelled out with an example so smaller models honor it reliably.
const TRANSLATOR_SYSTEM_PROMPT: &str = "\
You are a highly skilled professional translator. \n\
You are a native speaker of English, Japanese and Chinese. \n\
Translate the given text accurately, taking into account the context and specific instructions provided. \n\
Steps may include hints enclosed in square brackets [] with the key and value separated by a colon:. \n\
If no additional instructions or context are provided, use your expertise to consider what the most appropriate context is and provide a natural translation that aligns with that context. \n\
When translating, strive to faithfully reflect the meaning and tone of the original text, pay attention to cultural nuances and differences in language usage, and ensure that the translation is grammatically correct and easy to read. \n\
You MUST always translate the specified terms from the provided Keywords Map into the target language while preserving their original context and nuance. \n\
Input Example:\n\
\u{3000}・Keywords Map: {\"订单\": \"注文\", \"捡货\": \"ピッキング\", \"订单中心\": \"注文センター\"}\n\
\u{3000}・Target Language: Japanese\n\
Output Example:\n\
\u{3000}・\"订单\" → 注文\n\
\u{3000}・\"捡货\" → ピッキング\n\
\u{3000}・\"订单中心\" → 注文センター\n\
You DO NOT need to output your reasoning process, ONLY output your Final Translation. \n\
If no text for translation is provided, DO NOT output anything. \n\
Take a deep breath, calm down, and start translating.\n";

/// Render the translation request for one text unit.
pub(crate) fn simple_translate(
    source: Language,
    target: Language,
    keywords_map: &IndexMap<String, String>,
    input_text: &str,
) -> CompletionRequest {
    let keywords = serde_json::to_string(keywords_map).unwrap_or_else(|_| "{}".to_string());
    let prompt = format!(
        "Keywords Map: {keywords}\n\nInstruction: Translate {source} to {target}.\nInput text: {input_text}\n"
    );
    CompletionRequest::new(prompt).with_system(TRANSLATOR_SYSTEM_PROMPT)
}
