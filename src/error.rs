//! Error types for tonelaje.

use std::path::PathBuf;

/// Result type alias for tonelaje operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tonelaje operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// YAML error while parsing a rule configuration document.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV error during table import or export.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Column not found in the table.
    ///
    /// This is the fatal schema error: a required or expected column is
    /// absent, so the whole run aborts with no partial output.
    #[error("Missing required column in data: {name}")]
    ColumnNotFound {
        /// The name of the missing column.
        name: String,
    },

    /// Column already present when appending.
    #[error("Column '{name}' already exists in the table")]
    DuplicateColumn {
        /// The conflicting column name.
        name: String,
    },

    /// Row or column length does not match the table shape.
    #[error("Shape mismatch: {message}")]
    ShapeMismatch {
        /// Description of the shape mismatch.
        message: String,
    },

    /// Invalid rule configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Create a duplicate column error.
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
