//! Error types for the confstack library.
//!
//! Every fallible operation in the crate returns [`Result`], built on the
//! [`Error`] enum below using `thiserror`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a confstack error.
///
/// # Examples
///
/// ```
/// use confstack::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("json".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of the format registry an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Reading a configuration file.
    Parse,
    /// Serializing the configuration tree.
    Dump,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "configuration file"),
            Self::Dump => write!(f, "dump format"),
        }
    }
}

/// The main error type for the confstack library.
#[derive(Debug, Error)]
pub enum Error {
    /// A named configuration source does not exist.
    #[error("configuration file not found: {}", path.display())]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No adapter is registered for the requested extension.
    #[error("'{extension}' is not supported as a {kind}")]
    UnsupportedExtension {
        /// The extension that failed to resolve (may be empty).
        extension: String,
        /// Whether a parser or a dumper was requested.
        kind: FormatKind,
    },

    /// A built-in parser rejected the contents of a file.
    #[error("failed to parse {} as {format}: {message}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The format name (e.g. "json").
        format: &'static str,
        /// Description of the syntax problem.
        message: String,
    },

    /// A built-in dumper could not represent the tree.
    #[error("failed to dump configuration as {format}: {message}")]
    Serialize {
        /// The format name.
        format: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory path could not be turned into a glob pattern.
    #[error("invalid directory pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A failure reported by a caller-supplied adapter.
    #[error("adapter error: {0}")]
    Adapter(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps an arbitrary error raised inside a custom adapter.
    pub fn adapter<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Adapter(err.into())
    }

    /// Check if error indicates a missing configuration source.
    ///
    /// # Examples
    ///
    /// ```
    /// use confstack::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::FileNotFound { path: PathBuf::from("/nonexistent.json") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    /// Check if error is an unresolved extension of the given kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use confstack::{Error, FormatKind};
    ///
    /// let err = Error::UnsupportedExtension {
    ///     extension: "toml".to_string(),
    ///     kind: FormatKind::Dump,
    /// };
    /// assert!(err.is_unsupported_extension(FormatKind::Dump));
    /// assert!(!err.is_unsupported_extension(FormatKind::Parse));
    /// ```
    #[must_use]
    pub fn is_unsupported_extension(&self, expected: FormatKind) -> bool {
        matches!(self, Self::UnsupportedExtension { kind, .. } if *kind == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = Error::FileNotFound {
            path: PathBuf::from("/no/such/file.json"),
        };
        let display = format!("{err}");
        assert!(display.contains("not found"));
        let normalized = display.replace(std::path::MAIN_SEPARATOR, "/");
        assert!(normalized.contains("/no/such/file.json"));
    }

    #[test]
    fn test_unsupported_parse_extension_error() {
        let err = Error::UnsupportedExtension {
            extension: "cfg".to_string(),
            kind: FormatKind::Parse,
        };
        let display = format!("{err}");
        assert!(display.contains("'cfg'"));
        assert!(display.contains("configuration file"));
    }

    #[test]
    fn test_unsupported_dump_extension_error() {
        let err = Error::UnsupportedExtension {
            extension: "toml".to_string(),
            kind: FormatKind::Dump,
        };
        let display = format!("{err}");
        assert!(display.contains("'toml'"));
        assert!(display.contains("dump format"));
    }

    #[test]
    fn test_parse_error() {
        let err = Error::Parse {
            path: PathBuf::from("broken.ini"),
            format: "ini",
            message: "unterminated section header".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("broken.ini"));
        assert!(display.contains("as ini"));
        assert!(display.contains("unterminated"));
    }

    #[test]
    fn test_adapter_error_keeps_source() {
        let err = Error::adapter("remote store unavailable");
        assert!(format!("{err}").contains("remote store unavailable"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
        assert!(!err.is_not_found());
    }
}
