//! PHP-literal adapters.
//!
//! Reads scripts of the form `<?php return [ ... ];` without executing
//! anything: the returned expression must be a literal made of arrays
//! (`[...]` or `array(...)`), strings, numbers, booleans and `null`.
//! Writes the tree back in `var_export` layout.

use std::path::Path;

use serde_json::{Map, Number, Value};

use super::{parse_error, read_source, Dumper, Parser};
use crate::error::Result;

/// Parses `.php` files that return a literal array.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpParser;

impl Parser for PhpParser {
    fn parse(&self, path: &Path) -> Result<Value> {
        let contents = read_source(path)?;
        LiteralReader::new(&contents)
            .read_script()
            .map_err(|message| parse_error(path, "php", message))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ArrayKey {
    Int(i64),
    Str(String),
}

impl ArrayKey {
    /// Decimal strings such as `"5"` are stored as integer keys.
    fn from_string(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Int(n),
            _ => Self::Str(s),
        }
    }

    fn into_string(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Str(s) => s,
        }
    }
}

type ReadResult<T> = std::result::Result<T, String>;

/// Same nesting limit `serde_json` applies.
const MAX_DEPTH: usize = 128;

struct LiteralReader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LiteralReader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> ReadResult<()> {
        self.skip_trivia();
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{token}'")))
        }
    }

    fn unexpected(&self, wanted: &str) -> String {
        match self.peek() {
            Some(c) => format!("expected {wanted} at byte {}, found '{c}'", self.pos),
            None => format!("expected {wanted}, found end of file"),
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let before = self.pos;
            self.pos += self.rest().len() - self.rest().trim_start().len();
            if self.eat("//") || self.eat("#") {
                let line_end = self.rest().find('\n').unwrap_or(self.rest().len());
                self.pos += line_end;
            } else if self.eat("/*") {
                let close = self.rest().find("*/").map_or(self.rest().len(), |i| i + 2);
                self.pos += close;
            }
            if self.pos == before {
                break;
            }
        }
    }

    fn ident(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn read_script(mut self) -> ReadResult<Value> {
        self.pos += self.rest().len() - self.rest().trim_start().len();
        if !self.rest().get(..5).is_some_and(|tag| tag.eq_ignore_ascii_case("<?php")) {
            return Err("missing '<?php' open tag".to_string());
        }
        self.pos += 5;
        self.skip_trivia();
        if !self.ident().eq_ignore_ascii_case("return") {
            return Err("script must start with 'return'".to_string());
        }
        let value = self.read_value()?;
        self.skip_trivia();
        self.eat(";");
        self.skip_trivia();
        if !(self.rest().is_empty() || self.rest().starts_with("?>")) {
            return Err(self.unexpected("end of script"));
        }
        Ok(value)
    }

    fn read_value(&mut self) -> ReadResult<Value> {
        self.skip_trivia();
        match self.peek() {
            Some('[') => {
                self.bump();
                self.read_array(']')
            }
            Some('\'') => {
                self.bump();
                self.read_single_quoted().map(Value::String)
            }
            Some('"') => {
                self.bump();
                self.read_double_quoted().map(Value::String)
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.read_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let start = self.pos;
                let word = self.ident().to_ascii_lowercase();
                match word.as_str() {
                    "array" => {
                        self.expect("(")?;
                        self.read_array(')')
                    }
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    _ => {
                        self.pos = start;
                        Err(format!("unsupported expression '{word}' at byte {start}"))
                    }
                }
            }
            _ => Err(self.unexpected("a literal value")),
        }
    }

    fn read_array(&mut self, close: char) -> ReadResult<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(format!("nesting too deep at byte {}", self.pos));
        }
        self.depth += 1;
        let value = self.read_entries(close);
        self.depth -= 1;
        value
    }

    fn read_entries(&mut self, close: char) -> ReadResult<Value> {
        let mut entries: Vec<(ArrayKey, Value)> = Vec::new();
        let mut next_index: i64 = 0;

        loop {
            self.skip_trivia();
            if self.peek() == Some(close) {
                self.bump();
                break;
            }

            let first = self.read_value()?;
            self.skip_trivia();
            let (key, value) = if self.eat("=>") {
                (Self::array_key(first)?, self.read_value()?)
            } else {
                (ArrayKey::Int(next_index), first)
            };

            if let ArrayKey::Int(n) = key {
                next_index = next_index.max(n.saturating_add(1));
            }
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }

            self.skip_trivia();
            if !self.eat(",") {
                self.skip_trivia();
                if self.peek() != Some(close) {
                    return Err(self.unexpected(&format!("',' or '{close}'")));
                }
            }
        }

        let is_list = entries
            .iter()
            .zip(0_i64..)
            .all(|((k, _), i)| *k == ArrayKey::Int(i));
        if is_list {
            Ok(Value::Array(entries.into_iter().map(|(_, v)| v).collect()))
        } else {
            Ok(Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into_string(), v))
                    .collect(),
            ))
        }
    }

    fn array_key(value: Value) -> ReadResult<ArrayKey> {
        match value {
            Value::String(s) => Ok(ArrayKey::from_string(s)),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(float_key))
                .map(ArrayKey::Int)
                .ok_or_else(|| format!("unsupported array key {n}")),
            Value::Bool(b) => Ok(ArrayKey::Int(i64::from(b))),
            Value::Null => Ok(ArrayKey::Str(String::new())),
            Value::Array(_) | Value::Object(_) => {
                Err("arrays cannot be used as keys".to_string())
            }
        }
    }

    fn read_single_quoted(&mut self) -> ReadResult<String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.peek() {
                    Some(c @ ('\'' | '\\')) => {
                        self.bump();
                        out.push(c);
                    }
                    _ => out.push('\\'),
                },
                Some('\'') => return Ok(out),
                Some(c) => out.push(c),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn read_double_quoted(&mut self) -> ReadResult<String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '"' | '$')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err("unterminated string".to_string()),
                },
                Some('"') => return Ok(out),
                Some('$') => return Err("string interpolation is not supported".to_string()),
                Some(c) => out.push(c),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn read_number(&mut self) -> ReadResult<Value> {
        let start = self.pos;
        if !self.eat("-") {
            self.eat("+");
        }
        let rest = self.rest();
        let mut len = 0;
        let mut prev = ' ';
        for c in rest.chars() {
            let accepted = c.is_ascii_digit()
                || c == '.'
                || c == '_'
                || matches!(c, 'e' | 'E')
                || (matches!(c, '+' | '-') && matches!(prev, 'e' | 'E'));
            if !accepted {
                break;
            }
            prev = c;
            len += c.len_utf8();
        }
        self.pos += len;

        let text = self.src[start..self.pos].replace('_', "");
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("invalid number '{text}' at byte {start}"))
    }
}

/// Float keys truncate toward zero, like PHP does.
#[allow(clippy::cast_possible_truncation)]
fn float_key(f: f64) -> Option<i64> {
    let truncated = f.trunc();
    // i64::MAX is not exactly representable, so the upper bound is exclusive
    if truncated >= -(2_f64.powi(63)) && truncated < 2_f64.powi(63) {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Writes the tree as a PHP script returning a `var_export`-style array.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpDumper;

impl Dumper for PhpDumper {
    fn dump(&self, tree: &Map<String, Value>) -> Result<String> {
        let mut out = String::from("<?php return\n");
        export_map(&mut out, tree.iter().map(|(k, v)| (export_key(k), v)), 0);
        out.push(';');
        Ok(out)
    }
}

fn export_key(key: &str) -> String {
    match ArrayKey::from_string(key.to_string()) {
        ArrayKey::Int(n) => n.to_string(),
        ArrayKey::Str(s) => quote(&s),
    }
}

fn export_map<'v>(
    out: &mut String,
    entries: impl Iterator<Item = (String, &'v Value)>,
    indent: usize,
) {
    let pad = " ".repeat(indent + 2);
    out.push_str("array (\n");
    for (key, value) in entries {
        out.push_str(&format!("{pad}{key} => "));
        if value.is_array() || value.is_object() {
            out.push('\n');
            out.push_str(&pad);
        }
        export_value(out, value, indent + 2);
        out.push_str(",\n");
    }
    out.push_str(&" ".repeat(indent));
    out.push(')');
}

fn export_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => out.push_str(&i.to_string()),
            (None, Some(u), _) => out.push_str(&u.to_string()),
            (_, _, Some(f)) if f.is_finite() && f.fract().abs() < f64::EPSILON => {
                out.push_str(&format!("{f:.1}"));
            }
            _ => out.push_str(&n.to_string()),
        },
        Value::String(s) => out.push_str(&quote(s)),
        Value::Array(items) => export_map(
            out,
            items.iter().enumerate().map(|(i, v)| (i.to_string(), v)),
            indent,
        ),
        Value::Object(map) => {
            export_map(out, map.iter().map(|(k, v)| (export_key(k), v)), indent);
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
