//! Typed error handling for naylist.
//!
//! Every failure is fatal to a run: there is no partial output, so each
//! variant carries enough context (file, token or namespace set) to diagnose
//! the offending input.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for naylist operations.
#[derive(Error, Debug)]
pub enum NaylistError {
    /// An input document could not be read
    #[error("Cannot read {path}: {message}")]
    MissingInput {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed XML in a nodeset document
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<u32>,
        /// Column number (1-indexed) if available
        column: Option<u32>,
    },

    /// A token that looks like a node id but does not decode to one
    #[error("Malformed node id '{token}': {message}")]
    MalformedIdentifier { token: String, message: String },

    /// The dependency nodesets cannot be linearized by the namespace each introduces
    #[error(
        "Cannot order dependencies: unresolved namespaces [{}] in [{}]",
        .unresolved.join(", "),
        .documents.join(", ")
    )]
    AmbiguousDependencyOrder {
        /// Namespaces no remaining document could introduce on its own
        unresolved: Vec<String>,
        /// Documents left unordered
        documents: Vec<String>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// I/O error when writing output
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl NaylistError {
    /// Create a missing-input error from a failed read.
    pub fn missing_input(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::MissingInput {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a malformed identifier error.
    pub fn malformed(token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            token: token.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::MissingInput { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for naylist results.
pub type NaylistResult<T> = Result<T, NaylistError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Treat the failure as an unreadable input document.
    fn or_missing_input(self, path: impl Into<PathBuf>) -> NaylistResult<T>;

    /// Treat the failure as an output error.
    fn with_path(self, path: impl Into<PathBuf>) -> NaylistResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn or_missing_input(self, path: impl Into<PathBuf>) -> NaylistResult<T> {
        self.map_err(|e| NaylistError::missing_input(path, e))
    }

    fn with_path(self, path: impl Into<PathBuf>) -> NaylistResult<T> {
        self.map_err(|e| NaylistError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_error() {
        let err = NaylistError::missing_input(
            PathBuf::from("/nodesets/Opc.Ua.Di.NodeSet2.xml"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, NaylistError::MissingInput { .. }));
        assert_eq!(
            err.path(),
            Some(&PathBuf::from("/nodesets/Opc.Ua.Di.NodeSet2.xml"))
        );
        assert!(err.to_string().contains("Opc.Ua.Di.NodeSet2.xml"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = NaylistError::parse_at("app.xml", "unexpected end of stream", 10, 5);
        if let NaylistError::Parse { line, column, .. } = &err {
            assert_eq!(*line, Some(10));
            assert_eq!(*column, Some(5));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_ambiguous_order_lists_namespaces() {
        let err = NaylistError::AmbiguousDependencyOrder {
            unresolved: vec!["urn:a".into(), "urn:b".into()],
            documents: vec!["a.xml".into(), "b.xml".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("urn:a, urn:b"));
        assert!(msg.contains("a.xml, b.xml"));
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_malformed_identifier_message() {
        let err = NaylistError::malformed("ns=7;i=1", "namespace index 7 not declared");
        assert!(err.to_string().contains("ns=7;i=1"));
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let err = result.or_missing_input("/missing/file.xml").unwrap_err();
        assert!(matches!(err, NaylistError::MissingInput { .. }));

        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let err = result.with_path("/out/naylist.txt").unwrap_err();
        assert!(matches!(err, NaylistError::Io { .. }));
    }
}
