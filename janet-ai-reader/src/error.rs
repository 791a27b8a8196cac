//! Error types for the reader

use std::path::PathBuf;

/// Result type for reader operations.
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Errors surfaced by the reader.
///
/// Problems inside a single candidate range (lines past the end of the file,
/// ranges that clamp to nothing) are corrected silently by the chunk pipeline
/// and never show up here. What does show up means a collaborator is broken:
/// the file index couldn't find a file, or the model answered with something
/// that isn't a list of line ranges. None of these are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The file index doesn't know this path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// The model's answer could not be parsed into `{start, end}` pairs
    #[error("Malformed model response: {message}")]
    MalformedResponse { message: String },

    /// A tool call carried arguments that don't match the tool's parameters
    #[error("Invalid {tool} arguments: {message}")]
    InvalidArguments { tool: String, message: String },

    /// The model endpoint answered with a non-success status
    #[error("Model request failed with status {status}: {body}")]
    ModelRequest { status: u16, body: String },

    /// Transport-level failure talking to the model endpoint
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Configuration values that can't work
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file that isn't valid TOML for [`ReaderConfig`](crate::config::ReaderConfig)
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// IO errors other than a missing file
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ReaderError {
    /// Create a malformed-response error with a custom message.
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error with a custom message.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_arguments<T: Into<String>, S: Into<String>>(tool: T, message: S) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Whether this error means the requested file doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ReaderError::file_not_found("src/missing.rs").to_string(),
            "File not found: src/missing.rs"
        );
        assert_eq!(
            ReaderError::malformed("expected an array").to_string(),
            "Malformed model response: expected an array"
        );
        assert_eq!(
            ReaderError::invalid_arguments("read_file", "missing field `query`").to_string(),
            "Invalid read_file arguments: missing field `query`"
        );
        assert!(ReaderError::file_not_found("x").is_not_found());
        assert!(!ReaderError::malformed("x").is_not_found());
    }
}
