//! JSON adapters backed by `serde_json`.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{parse_error, read_source, Dumper, Parser};
use crate::error::{Error, Result};

/// Parses `.json` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, path: &Path) -> Result<Value> {
        let contents = read_source(path)?;
        serde_json::from_str(&contents).map_err(|e| parse_error(path, "json", e))
    }
}

/// Pretty-prints the tree with four-space indentation.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDumper;

impl Dumper for JsonDumper {
    fn dump(&self, tree: &Map<String, Value>) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        tree.serialize(&mut serializer).map_err(|e| Error::Serialize {
            format: "json",
            message: e.to_string(),
        })?;
        String::from_utf8(buf).map_err(|e| Error::Serialize {
            format: "json",
            message: e.to_string(),
        })
    }
}
