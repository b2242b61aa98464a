//! Format adapters.
//!
//! Each supported format implements [`Parser`] (file to value), [`Dumper`]
//! (tree to text), or both. Adapters are plain unit structs; the registry
//! builds them through factory closures so callers can plug in their own.
//!
//! | Format | Extensions    | Parse | Dump |
//! |--------|---------------|-------|------|
//! | JSON   | `json`        | yes   | yes  |
//! | YAML   | `yml`, `yaml` | yes   | yes  |
//! | INI    | `ini`         | yes   | yes  |
//! | PHP    | `php`         | yes   | yes  |
//! | XML    | `xml`         | yes   | no   |
//! | TOML   | `toml`        | opt-in | opt-in |

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub mod ini;
pub mod json;
pub mod php;
pub mod toml;
pub mod xml;
pub mod yaml;

pub use ini::{IniDumper, IniParser};
pub use json::{JsonDumper, JsonParser};
pub use php::{PhpDumper, PhpParser};
pub use self::toml::{TomlDumper, TomlParser};
pub use xml::XmlParser;
pub use yaml::{YamlDumper, YamlParser};

/// Reads a configuration file into a generic value.
///
/// The result does not have to be a map; the merge step coerces scalars,
/// lists and null into a tree.
pub trait Parser: Send + Sync {
    /// Parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    fn parse(&self, path: &Path) -> Result<Value>;
}

/// Serializes a configuration tree to text.
pub trait Dumper: Send + Sync {
    /// Render `tree` in this adapter's format.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be represented in the format.
    fn dump(&self, tree: &Map<String, Value>) -> Result<String>;
}

/// Reads a whole file as UTF-8.
pub(crate) fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(Error::from)
}

/// Builds a parse error for `path`.
pub(crate) fn parse_error(path: &Path, format: &'static str, message: impl ToString) -> Error {
    Error::Parse {
        path: path.to_path_buf(),
        format,
        message: message.to_string(),
    }
}

/// Renders a scalar the way the text formats print it, without quoting.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
