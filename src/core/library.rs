use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
    },
    AccessDenied {
        message: String,
        reason_code: Option<String>,
    },
    PreconditionFailed {
        message: String,
        reason_code: Option<String>,
    },
    Conflict {
        message: String,
        reason_code: Option<String>,
    },
    NotFound {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    // Raised by notification sinks and mail transports; the gateway swallows it after logging.
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code }
    }

    pub fn access_denied(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::AccessDenied { message: message.to_string(), reason_code }
    }

    pub fn precondition_failed(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::PreconditionFailed { message: message.to_string(), reason_code }
    }

    pub fn conflict(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Conflict { message: message.to_string(), reason_code }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    // store reported that nothing was written
    pub fn not_written(what: &str, id: &str) -> LibraryError {
        LibraryError::database(format!("failed to persist {} {}", what, id).as_str(),
                               Some("not_written".to_string()))
    }

    pub fn message(&self) -> &str {
        match self {
            LibraryError::Database { message, .. } => { message }
            LibraryError::AccessDenied { message, .. } => { message }
            LibraryError::PreconditionFailed { message, .. } => { message }
            LibraryError::Conflict { message, .. } => { message }
            LibraryError::NotFound { message } => { message }
            LibraryError::Validation { message, .. } => { message }
            LibraryError::Serialization { message } => { message }
            LibraryError::Runtime { message, .. } => { message }
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            LibraryError::Database { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::AccessDenied { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::PreconditionFailed { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::Conflict { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::NotFound { .. } => { None }
            LibraryError::Validation { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::Serialization { .. } => { None }
            LibraryError::Runtime { reason_code, .. } => { reason_code.as_deref() }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::AccessDenied { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::PreconditionFailed { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Conflict { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the lending engine.
pub type LibraryResult<T> = Result<T, LibraryError>;

// Normalizes a media type tag: trimmed and upper-cased, so "cd", " Cd " and "CD" are one type.
pub fn normalize_media_type(media_type: &str) -> String {
    media_type.trim().to_uppercase()
}

pub const BOOK: &str = "BOOK";
pub const CD: &str = "CD";

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum LoanStatus {
    Open,
    Returned,
}

impl From<String> for LoanStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Open" => LoanStatus::Open,
            "Returned" => LoanStatus::Returned,
            _ => LoanStatus::Open,
        }
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoanStatus::Open => write!(f, "Open"),
            LoanStatus::Returned => write!(f, "Returned"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum FineStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

impl From<String> for FineStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Unpaid" => FineStatus::Unpaid,
            "PartiallyPaid" => FineStatus::PartiallyPaid,
            "Paid" => FineStatus::Paid,
            _ => FineStatus::Unpaid,
        }
    }
}

impl Display for FineStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FineStatus::Unpaid => write!(f, "Unpaid"),
            FineStatus::PartiallyPaid => write!(f, "PartiallyPaid"),
            FineStatus::Paid => write!(f, "Paid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{FineStatus, LibraryError, LoanStatus, normalize_media_type};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None), LibraryError::Database{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_access_error() {
        assert!(matches!(LibraryError::access_denied("test", None), LibraryError::AccessDenied{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_precondition_error() {
        let err = LibraryError::precondition_failed("test", Some("overdue".to_string()));
        assert!(matches!(err, LibraryError::PreconditionFailed{ message: _, reason_code: _ }));
        assert_eq!(Some("overdue"), err.reason());
    }

    #[tokio::test]
    async fn test_should_create_conflict_error() {
        let err = LibraryError::conflict("test", Some("already_paid".to_string()));
        assert!(matches!(err, LibraryError::Conflict{ message: _, reason_code: _ }));
        assert_eq!(Some("already_paid"), err.reason());
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        let err = LibraryError::not_found("test");
        assert!(matches!(err, LibraryError::NotFound{ message: _ }));
        assert_eq!(None, err.reason());
        assert_eq!("test", err.message());
    }

    #[tokio::test]
    async fn test_should_create_validation_error() {
        assert!(matches!(LibraryError::validation("test", None), LibraryError::Validation{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_serialization_error() {
        assert!(matches!(LibraryError::serialization("test"), LibraryError::Serialization{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_runtime_error() {
        assert!(matches!(LibraryError::runtime("test", None), LibraryError::Runtime{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_written_error() {
        let err = LibraryError::not_written("patron", "p1");
        assert!(matches!(err, LibraryError::Database{ message: _, reason_code: _ }));
        assert_eq!(Some("not_written"), err.reason());
    }

    #[tokio::test]
    async fn test_should_normalize_media_type() {
        assert_eq!("CD", normalize_media_type(" cd "));
        assert_eq!("JOURNAL", normalize_media_type("Journal"));
    }

    #[tokio::test]
    async fn test_should_format_statuses() {
        for status in vec![LoanStatus::Open, LoanStatus::Returned] {
            assert_eq!(status, LoanStatus::from(status.to_string()));
        }
        for status in vec![FineStatus::Unpaid, FineStatus::PartiallyPaid, FineStatus::Paid] {
            assert_eq!(status, FineStatus::from(status.to_string()));
        }
    }
}
