//! XML parser backed by `quick-xml`.
//!
//! Mapping rules:
//! - the root element is the document; its children become keys
//! - an element holding only text becomes a string
//! - repeated sibling elements collapse into a list
//! - attributes are collected under `@attributes`
//! - an empty element becomes an empty map

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use super::{parse_error, read_source, Parser};
use crate::error::Result;

const ATTRIBUTES_KEY: &str = "@attributes";

/// Parses `.xml` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlParser;

impl Parser for XmlParser {
    fn parse(&self, path: &Path) -> Result<Value> {
        let contents = read_source(path)?;
        read_document(&contents).map_err(|message| parse_error(path, "xml", message))
    }
}

#[derive(Debug, Default)]
struct Element {
    attributes: Map<String, Value>,
    children: Vec<(String, Value)>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> std::result::Result<(String, Self), String> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut element = Self::default();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| format!("bad attribute on <{name}>: {e}"))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| format!("bad attribute value on <{name}>: {e}"))?;
            element
                .attributes
                .insert(key, Value::String(value.into_owned()));
        }
        Ok((name, element))
    }

    fn into_value(self) -> Value {
        let text = self.text.trim();
        if self.children.is_empty() && self.attributes.is_empty() {
            return if text.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::String(text.to_string())
            };
        }

        let mut map = Map::new();
        if !self.attributes.is_empty() {
            map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(self.attributes));
        }

        let mut grouped: Map<String, Value> = Map::new();
        let mut counts: Vec<(String, usize)> = Vec::new();
        for (name, value) in self.children {
            match counts.iter_mut().find(|(n, _)| *n == name) {
                Some((_, count)) => {
                    *count += 1;
                    if let Some(slot) = grouped.get_mut(&name) {
                        if *count == 2 {
                            let first = slot.take();
                            *slot = Value::Array(vec![first]);
                        }
                        if let Value::Array(items) = slot {
                            items.push(value);
                        }
                    }
                }
                None => {
                    counts.push((name.clone(), 1));
                    grouped.insert(name, value);
                }
            }
        }
        map.extend(grouped);

        if map.len() == 1 && map.contains_key(ATTRIBUTES_KEY) && !text.is_empty() {
            map.insert("0".to_string(), Value::String(text.to_string()));
        }
        Value::Object(map)
    }
}

fn read_document(contents: &str) -> std::result::Result<Value, String> {
    let mut reader = Reader::from_str(contents);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<(String, Element)> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;
        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err("document has more than one root element".to_string());
                }
                stack.push(Element::open(&start)?);
            }
            Event::Empty(start) => {
                let (name, element) = Element::open(&start)?;
                attach(&mut stack, &mut root, name, element.into_value())?;
            }
            Event::End(_) => {
                let (name, element) = stack
                    .pop()
                    .ok_or_else(|| "closing tag without matching open tag".to_string())?;
                attach(&mut stack, &mut root, name, element.into_value())?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                if let Some((_, element)) = stack.last_mut() {
                    element.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some((_, element)) = stack.last_mut() {
                    element
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some((name, _)) = stack.last() {
        return Err(format!("element <{name}> is never closed"));
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn attach(
    stack: &mut [(String, Element)],
    root: &mut Option<Value>,
    name: String,
    value: Value,
) -> std::result::Result<(), String> {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push((name, value)),
        None if root.is_none() => *root = Some(value),
        None => return Err("document has more than one root element".to_string()),
    }
    Ok(())
}
