//! INI adapters.
//!
//! The reader understands `[section]` headers, `key = value` pairs,
//! `key[] = value` list entries and `;` / `#` comments. Values are scanned
//! typed: booleans, `null`, integers and floats are converted, quoted
//! strings are unquoted, anything else is kept as a string.

use std::path::Path;

use serde_json::{Map, Number, Value};

use super::{parse_error, read_source, Dumper, Parser};
use crate::config::tree::descend_mut;
use crate::error::{Error, Result};

/// Parses `.ini` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniParser;

impl Parser for IniParser {
    fn parse(&self, path: &Path) -> Result<Value> {
        let contents = read_source(path)?;
        parse_ini(&contents)
            .map(Value::Object)
            .map_err(|message| parse_error(path, "ini", message))
    }
}

fn parse_ini(contents: &str) -> std::result::Result<Map<String, Value>, String> {
    let mut root = Map::new();
    let mut section: Option<String> = None;

    for (index, raw) in contents.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let (name, trailing) = header
                .split_once(']')
                .ok_or_else(|| format!("line {line_no}: unterminated section header"))?;
            let trailing = trailing.trim();
            if !(trailing.is_empty() || trailing.starts_with(';') || trailing.starts_with('#')) {
                return Err(format!("line {line_no}: unexpected text after section header"));
            }
            let name = name.trim();
            if name.is_empty() {
                return Err(format!("line {line_no}: empty section name"));
            }
            descend_mut(
                root.entry(name.to_string())
                    .or_insert_with(|| Value::Object(Map::new())),
            );
            section = Some(name.to_string());
            continue;
        }

        let (key, raw_value) = line
            .split_once('=')
            .ok_or_else(|| format!("line {line_no}: expected 'key = value'"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("line {line_no}: missing key"));
        }
        let value = scan_value(raw_value.trim())
            .ok_or_else(|| format!("line {line_no}: unterminated quoted value"))?;

        let target = match &section {
            Some(name) => descend_mut(
                root.entry(name.clone())
                    .or_insert_with(|| Value::Object(Map::new())),
            ),
            None => &mut root,
        };

        if let Some(list_key) = key.strip_suffix("[]") {
            let slot = target
                .entry(list_key.trim().to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            if let Value::Array(items) = slot {
                items.push(value);
            }
        } else {
            target.insert(key.to_string(), value);
        }
    }

    Ok(root)
}

/// Converts the text to the right of `=` into a value.
///
/// Returns `None` for a quoted value with no closing quote.
fn scan_value(raw: &str) -> Option<Value> {
    if let Some(rest) = raw.strip_prefix('"') {
        return unquote(rest, '"').map(Value::String);
    }
    if let Some(rest) = raw.strip_prefix('\'') {
        return unquote(rest, '\'').map(Value::String);
    }

    let text = raw.split(';').next().unwrap_or_default().trim();
    let value = match text.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => Value::Bool(true),
        "false" | "off" | "no" | "none" => Value::Bool(false),
        "null" => Value::Null,
        _ => scan_number(text).unwrap_or_else(|| Value::String(text.to_string())),
    };
    Some(value)
}

fn scan_number(text: &str) -> Option<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    let numeric = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !numeric {
        return None;
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Reads up to the closing `quote`, honoring backslash escapes.
fn unquote(rest: &str, quote: char) -> Option<String> {
    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            c if c == quote => return Some(out),
            c => out.push(c),
        }
    }
    None
}

/// Writes the tree as INI.
///
/// Top-level scalars and lists come first, then one `[section]` per
/// top-level map. Maps nested inside a section are flattened with dotted
/// keys. Lists of containers cannot be expressed and fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniDumper;

impl Dumper for IniDumper {
    fn dump(&self, tree: &Map<String, Value>) -> Result<String> {
        let mut out = String::new();

        for (key, value) in tree.iter().filter(|(_, v)| !v.is_object()) {
            write_entry(&mut out, key, value)?;
        }

        for (name, value) in tree {
            if let Value::Object(section) = value {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&format!("[{name}]\n"));
                write_section(&mut out, "", section)?;
            }
        }

        Ok(out)
    }
}

fn write_section(out: &mut String, prefix: &str, map: &Map<String, Value>) -> Result<()> {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => write_section(out, &full_key, nested)?,
            other => write_entry(out, &full_key, other)?,
        }
    }
    Ok(())
}

fn write_entry(out: &mut String, key: &str, value: &Value) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                if item.is_array() || item.is_object() {
                    return Err(Error::Serialize {
                        format: "ini",
                        message: format!("'{key}' holds nested containers inside a list"),
                    });
                }
                out.push_str(&format!("{key}[]={}\n", ini_scalar(item)));
            }
        }
        other => out.push_str(&format!("{key}={}\n", ini_scalar(other))),
    }
    Ok(())
}

fn ini_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        other => super::scalar_text(other).unwrap_or_default(),
    }
}
