use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BpkError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Glob Pattern Error: {0}")]
    Pattern(#[from] Arc<glob::PatternError>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Parsing Error in {0}: {1}")]
    ParseError(String, String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("Subset Load Error: {0}")]
    SubsetLoadError(String),

    #[error("Manifest Error: {0}")]
    ManifestError(String),

    #[error("Failed to execute command: {0}")]
    CommandExecError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

/// Coarse classification of a [`BpkError`], independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    NotFound,
    SubsetLoad,
    Manifest,
    Config,
    Command,
    Other,
}

impl BpkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BpkError::Io(_) | BpkError::IoError(_) => ErrorKind::Io,
            BpkError::Json(_) | BpkError::ParseError(..) => ErrorKind::Parse,
            BpkError::NotFound(_) => ErrorKind::NotFound,
            BpkError::SubsetLoadError(_) => ErrorKind::SubsetLoad,
            BpkError::ManifestError(_) => ErrorKind::Manifest,
            BpkError::Config(_) => ErrorKind::Config,
            BpkError::CommandExecError(_) => ErrorKind::Command,
            BpkError::Pattern(_) | BpkError::Generic(_) => ErrorKind::Other,
        }
    }

    /// Whether this error ends the whole run rather than a single dependency.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Manifest | ErrorKind::Command)
    }
}

impl From<std::io::Error> for BpkError {
    fn from(err: std::io::Error) -> Self {
        BpkError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for BpkError {
    fn from(err: serde_json::Error) -> Self {
        BpkError::Json(Arc::new(err))
    }
}

impl From<glob::PatternError> for BpkError {
    fn from(err: glob::PatternError) -> Self {
        BpkError::Pattern(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BpkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_and_classify() {
        let err: BpkError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!err.is_fatal());
    }

    #[test]
    fn manifest_and_command_errors_are_fatal() {
        assert!(BpkError::ManifestError("bad".into()).is_fatal());
        assert!(BpkError::CommandExecError("exit 1".into()).is_fatal());
        assert!(!BpkError::NotFound("jquery".into()).is_fatal());
        assert!(!BpkError::SubsetLoadError("x".into()).is_fatal());
    }

    #[test]
    fn messages_carry_their_context() {
        let err = BpkError::ParseError("/tmp/bower.json".into(), "expected value".into());
        assert_eq!(
            err.to_string(),
            "Parsing Error in /tmp/bower.json: expected value"
        );
    }
}
