use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors of a combine run.
///
/// Per-file problems (binary content, oversized files, unreadable paths) are
/// never represented here; they are recorded on the file itself and the run
/// continues.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The request blob was empty, malformed, or carried no paths.
    #[error("{message}")]
    Input {
        /// Detailed error message
        message: String,
    },

    /// The request was well formed but resolved to nothing.
    #[error("{message}")]
    Validation {
        /// Detailed error message
        message: String,
    },

    /// The combined text could not be delivered.
    #[error("Failed to write output to '{path}': {message}")]
    Output {
        /// Destination that failed (`<stdout>` for the primary stream)
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },
}

impl Error {
    /// Creates a request decoding error.
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an output error with path context.
    #[must_use]
    pub fn output(path: impl Into<PathBuf>, source: &std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates an output error for the primary output stream.
    #[must_use]
    pub fn stdout(source: &std::io::Error) -> Self {
        Self::output("<stdout>", source)
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a request decoding error.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Input { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if this is an output error.
    #[must_use]
    pub const fn is_output(&self) -> bool {
        matches!(self, Self::Output { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Input { .. } => 2,
            Self::Validation { .. } => 3,
            Self::Output { .. } => 4,
            Self::Config { .. } => 1,
        }
    }
}
