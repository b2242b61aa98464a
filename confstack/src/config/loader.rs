//! Configuration sources and their expansion into concrete files.
//!
//! A [`Source`] is a file, a directory, or a nested list of either.
//! [`SourceResolver`] flattens it into the ordered list of files to load.

use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::error::{Error, Result};

/// Something `Config::add` can load from.
///
/// Conversions exist from the usual path types and from vectors/arrays of
/// anything convertible, so nested lists can be built directly.
///
/// # Examples
///
/// ```
/// use confstack::Source;
/// use std::path::PathBuf;
///
/// let single = Source::from("config/app.json");
/// let layered = Source::from(vec![
///     Source::from("config/defaults"),
///     Source::from(vec![PathBuf::from("config/prod.yml"), PathBuf::from("local.ini")]),
/// ]);
/// assert_eq!(layered.len(), 3);
/// assert_eq!(single.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A single file or directory.
    Path(PathBuf),
    /// Sources resolved in order.
    List(Vec<Source>),
}

impl Source {
    /// Number of leaf paths in this source (directories count once).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Path(_) => 1,
            Self::List(items) => items.iter().map(Self::len).sum(),
        }
    }

    /// Returns true if this is a list with no paths in it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for Source {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&PathBuf> for Source {
    fn from(path: &PathBuf) -> Self {
        Self::Path(path.clone())
    }
}

impl<T: Into<Source>> From<Vec<T>> for Source {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Source>, const N: usize> From<[T; N]> for Source {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Expands sources into the files to load, in load order.
///
/// # Examples
///
/// ```no_run
/// use confstack::{Source, SourceResolver};
///
/// let files = SourceResolver::resolve(&Source::from(["config", "local.yml"])).unwrap();
/// for file in files {
///     println!("{}", file.display());
/// }
/// ```
pub struct SourceResolver;

impl SourceResolver {
    /// Resolve `source` into an ordered list of files.
    ///
    /// - Lists are flattened depth-first, left to right.
    /// - A directory expands to its direct children matching `*.*`, sorted
    ///   by name. Hidden entries and subdirectories are skipped; an empty
    ///   directory yields nothing.
    /// - An existing file yields itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if a path is neither an existing
    /// directory nor an existing file.
    pub fn resolve(source: &Source) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        Self::resolve_into(source, &mut files)?;
        Ok(files)
    }

    fn resolve_into(source: &Source, files: &mut Vec<PathBuf>) -> Result<()> {
        match source {
            Source::List(items) => {
                for item in items {
                    Self::resolve_into(item, files)?;
                }
            }
            Source::Path(path) if path.is_dir() => {
                let found = Self::expand_dir(path)?;
                log::debug!("expanded {} into {} file(s)", path.display(), found.len());
                files.extend(found);
            }
            Source::Path(path) if path.exists() => files.push(path.clone()),
            Source::Path(path) => {
                return Err(Error::FileNotFound { path: path.clone() });
            }
        }
        Ok(())
    }

    fn expand_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        let pattern = format!("{}/*.*", glob::Pattern::escape(&dir.to_string_lossy()));
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };

        let mut files = Vec::new();
        for entry in glob::glob_with(&pattern, options)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(err) => {
                    log::debug!("skipping unreadable entry {}: {err}", err.path().display());
                }
            }
        }
        Ok(files)
    }
}

/// The dispatch key for a file: everything after the last `.` of its name.
///
/// Returns an empty string when the name has no dot, which no adapter
/// claims.
///
/// # Examples
///
/// ```
/// use confstack::config::extension_of;
/// use std::path::Path;
///
/// assert_eq!(extension_of(Path::new("conf/app.local.yml")), "yml");
/// assert_eq!(extension_of(Path::new("conf/.env")), "env");
/// assert_eq!(extension_of(Path::new("Makefile")), "");
/// ```
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .unwrap_or_default()
}
