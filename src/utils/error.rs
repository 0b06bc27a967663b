use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopsisError {
    #[error("{field} length ({actual}) must match number of criteria columns ({expected})")]
    ShapeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid value '{value}' in {field}: {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Source request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Config,
    Network,
    Storage,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl TopsisError {
    pub fn validation(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ShapeMismatch { .. } | Self::ValidationError { .. } | Self::CsvError(_) => {
                ErrorCategory::Input
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Config,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ShapeMismatch { field, expected, .. } => format!(
                "Provide exactly {} comma-separated {}, one per criterion column",
                expected, field
            ),
            Self::ValidationError { field, .. } if field.starts_with("weights") => {
                "Weights must be positive numbers, e.g. 1,1,2,0.5".to_string()
            }
            Self::ValidationError { field, .. } if field.starts_with("impacts") => {
                "Impacts must be '+' (benefit) or '-' (cost), e.g. +,+,-,+".to_string()
            }
            Self::ValidationError { .. } | Self::CsvError(_) => {
                "Check that the first column holds identifiers and every other cell is a number"
                    .to_string()
            }
            Self::ApiError(_) => "Check the source URL and network connectivity, then retry".to_string(),
            Self::IoError(_) | Self::ZipError(_) => {
                "Check that the input file exists and the output path is writable".to_string()
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => {
                "Review the command line arguments or the job file".to_string()
            }
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid input data: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::Network => format!("Could not fetch the decision table: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Internal => format!("Unexpected failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TopsisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message_names_field_and_counts() {
        let err = TopsisError::ShapeMismatch {
            field: "weights".to_string(),
            expected: 2,
            actual: 3,
        };

        assert_eq!(
            err.to_string(),
            "weights length (3) must match number of criteria columns (2)"
        );
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("exactly 2"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = TopsisError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing.csv",
        ));

        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("Could not read or write files"));
    }

    #[test]
    fn test_severity_follows_category() {
        let config = TopsisError::ConfigError {
            message: "unused".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::High);

        let processing = TopsisError::ProcessingError {
            message: "writer".to_string(),
        };
        assert_eq!(processing.severity(), ErrorSeverity::Critical);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
    }

    #[test]
    fn test_impact_validation_suggestion() {
        let err = TopsisError::validation("impacts[1]", "*", "expected '+' or '-'");
        assert!(err.recovery_suggestion().contains("'+' (benefit)"));
    }
}
