use crate::Result;
use async_trait::async_trait;

/// A single completion request: optional system instructions plus the user
/// prompt.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { system: None, prompt: prompt.into() }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// The opaque chat capability the translation service runs on.
///
/// Implementations own their own timeout and retry behaviour; callers treat
/// the output as non-deterministic and never cache it.
#[async_trait]
pub trait Llm: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, req: CompletionRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_builder() {
        let req = CompletionRequest::new("translate this").with_system("you are a translator");
        assert_eq!(req.prompt, "translate this");
        assert_eq!(req.system.as_deref(), Some("you are a translator"));
    }
}
