use thiserror::Error;

/// Main error type for the redactor library
#[derive(Error, Debug)]
pub enum RedactorError {
    #[error("Track descriptor error: {0}")]
    Track(#[from] TrackError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Line-level descriptor errors
///
/// These are all recoverable: the loader logs the offending line and either
/// skips it or substitutes a documented default. They never abort loading.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Malformed track line '{line}': {reason}")]
    MalformedLine { line: String, reason: String },

    #[error("Unknown redaction method '{token}'")]
    UnknownMethod { token: String },

    #[error("Unparseable color '{spec}'")]
    UnparseableColor { spec: String },

    #[error("Malformed seed directive '{line}'")]
    MalformedSeed { line: String },
}

/// Construction-time errors
///
/// Surfaced to the host as fatal filter-construction failures. There is no
/// retry policy.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No track descriptor given")]
    MissingDescriptor,

    #[error("Can't read track descriptor: {path}")]
    UnreadableDescriptor { path: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },
}

/// Convenience type alias for Results using RedactorError
pub type Result<T> = std::result::Result<T, RedactorError>;

impl RedactorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (log and continue)
    ///
    /// Line-level descriptor errors are recoverable; construction errors are
    /// terminal.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Track(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(ConfigError::MissingDescriptor) => {
                "No track descriptor was given. Pass the path to a redaction track file.".to_string()
            }
            Self::Config(ConfigError::UnreadableDescriptor { path }) => {
                format!("Could not read track descriptor '{}'. Please check the file exists and is readable.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
