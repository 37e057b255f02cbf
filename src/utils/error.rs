use crate::domain::model::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchoolError {
    #[error("{entity} with key '{key}' already exists")]
    DuplicateKey { entity: EntityKind, key: String },

    #[error("{entity} with key '{key}' was not found")]
    NotFound { entity: EntityKind, key: String },

    #[error("No subject found with name: {name}")]
    SubjectNotFound { name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Report error: {message}")]
    ReportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Integrity,
    Lookup,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SchoolError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SchoolError::DuplicateKey { .. } => ErrorCategory::Integrity,
            SchoolError::NotFound { .. } | SchoolError::SubjectNotFound { .. } => {
                ErrorCategory::Lookup
            }
            SchoolError::ConfigValidationError { .. }
            | SchoolError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SchoolError::IoError(_)
            | SchoolError::SerializationError(_)
            | SchoolError::CsvError(_)
            | SchoolError::ReportError { .. } => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Integrity => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SchoolError::DuplicateKey { .. } => {
                "Remove the duplicated tutor code, subject name or student id from the dataset"
            }
            SchoolError::NotFound { .. } => {
                "Check that every referenced tutor and subject is declared in the dataset"
            }
            SchoolError::SubjectNotFound { .. } => "Check the subject name used by the report",
            SchoolError::ConfigValidationError { .. }
            | SchoolError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments"
            }
            SchoolError::IoError(_) => "Make sure the file exists and is readable",
            SchoolError::SerializationError(_)
            | SchoolError::CsvError(_)
            | SchoolError::ReportError { .. } => "Check that the report output is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Integrity => format!("Dataset integrity problem: {}", self),
            ErrorCategory::Lookup => format!("Lookup failed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_are_low_severity() {
        let err = SchoolError::SubjectNotFound {
            name: "Unknown".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.to_string(), "No subject found with name: Unknown");
    }

    #[test]
    fn test_duplicate_key_message() {
        let err = SchoolError::DuplicateKey {
            entity: EntityKind::Tutor,
            key: "JSMI".to_string(),
        };
        assert_eq!(err.to_string(), "Tutor with key 'JSMI' already exists");
        assert!(err.user_friendly_message().starts_with("Dataset integrity problem"));
    }
}
