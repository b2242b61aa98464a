//! TOML adapters backed by the `toml` crate.
//!
//! These are not part of the default registries; register them with
//! [`Config::add_parsers`](crate::Config::add_parsers) and
//! [`Config::add_dumpers`](crate::Config::add_dumpers).

use std::path::Path;

use serde_json::{Map, Value};

use super::{parse_error, read_source, Dumper, Parser};
use crate::error::{Error, Result};

/// Parses `.toml` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlParser;

impl Parser for TomlParser {
    fn parse(&self, path: &Path) -> Result<Value> {
        let contents = read_source(path)?;
        ::toml::from_str(&contents).map_err(|e| parse_error(path, "toml", e.message()))
    }
}

/// Renders the tree as TOML.
///
/// TOML has no null, so trees containing null values fail to dump.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlDumper;

impl Dumper for TomlDumper {
    fn dump(&self, tree: &Map<String, Value>) -> Result<String> {
        ::toml::to_string(tree).map_err(|e| Error::Serialize {
            format: "toml",
            message: e.to_string(),
        })
    }
}
