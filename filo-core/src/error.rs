#[derive(Debug, thiserror::Error)]
pub enum FiloError {
    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Voice error: {0}")]
    Voice(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FiloError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FiloError::Chat("test error".to_string());
        assert_eq!(err.to_string(), "Chat error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let filo_err: FiloError = io_err.into();
        assert!(matches!(filo_err, FiloError::Io(_)));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result.unwrap(), 42);

        let err_result: Result<i32> = Err(FiloError::Config("invalid".to_string()));
        assert!(err_result.is_err());
    }
}
