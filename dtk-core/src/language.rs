use serde::{Deserialize, Serialize};

/// Languages the translation service accepts as source or target.
///
/// The serialized form matches the wire values exchanged with clients
/// (`"Japanese"`, `"English"`, `"Chinese"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Japanese,
    English,
    Chinese,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Japanese => "Japanese",
            Self::English => "English",
            Self::Chinese => "Chinese",
        }
    }

    /// Font family applied to rebuilt runs when this is the target language.
    pub fn default_font(self) -> &'static str {
        match self {
            Self::English => "Arial",
            Self::Japanese => "Meiryo UI",
            Self::Chinese => "Microsoft YaHei",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_values() {
        assert_eq!(serde_json::to_string(&Language::Japanese).unwrap(), "\"Japanese\"");
        let lang: Language = serde_json::from_str("\"Chinese\"").unwrap();
        assert_eq!(lang, Language::Chinese);
    }

    #[test]
    fn test_default_fonts() {
        assert_eq!(Language::English.default_font(), "Arial");
        assert_eq!(Language::Japanese.default_font(), "Meiryo UI");
        assert_eq!(Language::Chinese.default_font(), "Microsoft YaHei");
    }
}
