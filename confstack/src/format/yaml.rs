//! YAML adapters backed by `serde_yaml`.

use std::path::Path;

use serde_json::{Map, Value};

use super::{parse_error, read_source, Dumper, Parser};
use crate::error::{Error, Result};

/// Parses `.yml` / `.yaml` files.
///
/// An empty document parses to null, which the merge step treats as an
/// empty tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl Parser for YamlParser {
    fn parse(&self, path: &Path) -> Result<Value> {
        let contents = read_source(path)?;
        if contents.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml::from_str(&contents).map_err(|e| parse_error(path, "yaml", e))
    }
}

/// Renders the tree as block-style YAML.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlDumper;

impl Dumper for YamlDumper {
    fn dump(&self, tree: &Map<String, Value>) -> Result<String> {
        serde_yaml::to_string(tree).map_err(|e| Error::Serialize {
            format: "yaml",
            message: e.to_string(),
        })
    }
}
