#[derive(Debug, thiserror::Error)]
pub enum DtkError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Translator error: {0}")]
    Translator(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DtkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DtkError::UnsupportedFormat("odt".to_string());
        assert_eq!(err.to_string(), "Unsupported format: odt");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let dtk_err: DtkError = io_err.into();
        assert!(matches!(dtk_err, DtkError::Io(_)));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result.unwrap(), 42);

        let err_result: Result<i32> = Err(DtkError::Config("invalid".to_string()));
        assert!(err_result.is_err());
    }
}
