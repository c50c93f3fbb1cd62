use crate::domain::model::Surface;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MsesError {
    #[error("Malformed MSES curve: {reason}")]
    MalformedCurve { reason: String },

    #[error("Length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("{surface} surface is empty")]
    EmptySurface { surface: Surface },

    #[error("{surface} surface x-coordinates are not ascending")]
    UnsortedSurface { surface: Surface },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Column '{name}' not found")]
    MissingColumn { name: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Geometry,
    Input,
    Io,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MsesError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        MsesError::MalformedCurve {
            reason: reason.into(),
        }
    }

    pub fn length_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        MsesError::LengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MsesError::MalformedCurve { .. }
            | MsesError::LengthMismatch { .. }
            | MsesError::EmptySurface { .. }
            | MsesError::UnsortedSurface { .. } => ErrorCategory::Geometry,
            MsesError::Parse { .. } | MsesError::MissingColumn { .. } => ErrorCategory::Input,
            MsesError::ZipError(_)
            | MsesError::CsvError(_)
            | MsesError::IoError(_)
            | MsesError::SerializationError(_) => ErrorCategory::Io,
            MsesError::ConfigValidationError { .. }
            | MsesError::InvalidConfigValueError { .. }
            | MsesError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MsesError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Geometry | ErrorCategory::Processing => {
                ErrorSeverity::High
            }
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MsesError::MalformedCurve { .. } => {
                "Check that the file is in MSES order: trailing edge, upper surface to the leading edge, then lower surface back"
            }
            MsesError::LengthMismatch { .. } => {
                "Make sure every column has the same number of points"
            }
            MsesError::EmptySurface { .. } => "Both surface files must contain at least one point",
            MsesError::UnsortedSurface { .. } => {
                "Surface x-coordinates must increase from the leading edge to the trailing edge"
            }
            MsesError::Parse { .. } => {
                "The first row is a header; every other row must hold the same number of numeric columns"
            }
            MsesError::MissingColumn { .. } => "Check the column names in the input header",
            MsesError::IoError(_) => "Check that the path exists and is readable/writable",
            MsesError::CsvError(_) | MsesError::ZipError(_) | MsesError::SerializationError(_) => {
                "Check free disk space and permissions of the output directory"
            }
            MsesError::ConfigValidationError { .. }
            | MsesError::InvalidConfigValueError { .. }
            | MsesError::MissingConfigError { .. } => {
                "Fix the configuration value and run again"
            }
            MsesError::ProcessingError { .. } => "Re-run with --verbose to see the failing step",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Geometry => format!("Airfoil data could not be processed: {}", self),
            ErrorCategory::Input => format!("Input file could not be read: {}", self),
            ErrorCategory::Io => format!("File operation failed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MsesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_errors_are_categorized() {
        let err = MsesError::malformed("no leading edge");
        assert_eq!(err.category(), ErrorCategory::Geometry);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("no leading edge"));

        let err = MsesError::EmptySurface {
            surface: Surface::Lower,
        };
        assert_eq!(err.to_string(), "lower surface is empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.dat");
        let err: MsesError = io.into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("missing.dat"));
    }
}
