//! Extension-based dispatch to format adapters.
//!
//! The registry keeps two ordered lists of entries, one for parsers and one
//! for dumpers. Lookup takes the first entry that claims the extension.
//! Parsers are instantiated once per extension and cached for the life of
//! the registry; later registrations do not affect an extension that has
//! already been resolved.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, FormatKind, Result};
use crate::format::{
    Dumper, IniDumper, IniParser, JsonDumper, JsonParser, Parser, PhpDumper, PhpParser,
    XmlParser, YamlDumper, YamlParser,
};

/// A set of extensions and the factory that builds their adapter.
pub struct FormatEntry<A: ?Sized> {
    extensions: Vec<String>,
    factory: Box<dyn Fn() -> Box<A> + Send + Sync>,
}

/// Registry entry for a parser.
pub type ParserEntry = FormatEntry<dyn Parser>;

/// Registry entry for a dumper.
pub type DumperEntry = FormatEntry<dyn Dumper>;

impl<A: ?Sized> FormatEntry<A> {
    /// Creates an entry from a factory closure and the extensions it claims.
    ///
    /// Extensions are matched case-insensitively and without the leading dot.
    pub fn new<F, I, S>(factory: F, extensions: I) -> Self
    where
        F: Fn() -> Box<A> + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_lowercase())
                .collect(),
            factory: Box::new(factory),
        }
    }

    /// The extensions this entry claims, lower-cased.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn claims(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }

    fn build(&self) -> Box<A> {
        (self.factory)()
    }
}

impl ParserEntry {
    /// Entry for a parser type that can be default-constructed.
    ///
    /// # Examples
    ///
    /// ```
    /// use confstack::format::JsonParser;
    /// use confstack::ParserEntry;
    ///
    /// let entry = ParserEntry::of::<JsonParser, _, _>(["json", "JSON5"]);
    /// assert_eq!(entry.extensions(), ["json", "json5"]);
    /// ```
    #[must_use]
    pub fn of<T, I, S>(extensions: I) -> Self
    where
        T: Parser + Default + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(|| Box::new(T::default()) as Box<dyn Parser>, extensions)
    }
}

impl DumperEntry {
    /// Entry for a dumper type that can be default-constructed.
    #[must_use]
    pub fn of<T, I, S>(extensions: I) -> Self
    where
        T: Dumper + Default + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(|| Box::new(T::default()) as Box<dyn Dumper>, extensions)
    }
}

impl<A: ?Sized> fmt::Debug for FormatEntry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatEntry")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

/// Parser and dumper lookup by file extension.
///
/// # Examples
///
/// ```
/// use confstack::{FormatKind, FormatRegistry};
///
/// let mut registry = FormatRegistry::default();
/// assert!(registry.resolve_parser("YML").is_ok());
/// assert!(registry.is_parser_cached("yml"));
///
/// let err = registry.resolve_dumper("toml").err().unwrap();
/// assert!(err.is_unsupported_extension(FormatKind::Dump));
/// ```
pub struct FormatRegistry {
    parsers: Vec<ParserEntry>,
    dumpers: Vec<DumperEntry>,
    cached_parsers: HashMap<String, Box<dyn Parser>>,
}

impl Default for FormatRegistry {
    /// Registry seeded with the built-in adapters.
    fn default() -> Self {
        Self {
            parsers: vec![
                ParserEntry::of::<JsonParser, _, _>(["json"]),
                ParserEntry::of::<YamlParser, _, _>(["yml", "yaml"]),
                ParserEntry::of::<IniParser, _, _>(["ini"]),
                ParserEntry::of::<PhpParser, _, _>(["php"]),
                ParserEntry::of::<XmlParser, _, _>(["xml"]),
            ],
            dumpers: vec![
                DumperEntry::of::<JsonDumper, _, _>(["json"]),
                DumperEntry::of::<YamlDumper, _, _>(["yml", "yaml"]),
                DumperEntry::of::<IniDumper, _, _>(["ini"]),
                DumperEntry::of::<PhpDumper, _, _>(["php"]),
            ],
            cached_parsers: HashMap::new(),
        }
    }
}

impl FormatRegistry {
    /// Registry with no adapters at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
            dumpers: Vec::new(),
            cached_parsers: HashMap::new(),
        }
    }

    /// Puts `entries` ahead of every existing parser entry.
    ///
    /// Extensions that were already resolved keep their cached parser.
    pub fn add_parsers<I: IntoIterator<Item = ParserEntry>>(&mut self, entries: I) {
        let mut parsers: Vec<_> = entries.into_iter().collect();
        for entry in &parsers {
            let pinned: Vec<_> = entry
                .extensions()
                .iter()
                .filter(|ext| self.cached_parsers.contains_key(*ext))
                .collect();
            if !pinned.is_empty() {
                log::debug!("parser already cached for {pinned:?}; new mapping ignored for them");
            }
        }
        parsers.append(&mut self.parsers);
        self.parsers = parsers;
    }

    /// Puts `entries` ahead of every existing dumper entry.
    pub fn add_dumpers<I: IntoIterator<Item = DumperEntry>>(&mut self, entries: I) {
        let mut dumpers: Vec<_> = entries.into_iter().collect();
        dumpers.append(&mut self.dumpers);
        self.dumpers = dumpers;
    }

    /// Returns the parser for `extension`, building and caching it on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedExtension`] if no entry claims the
    /// extension.
    pub fn resolve_parser(&mut self, extension: &str) -> Result<&dyn Parser> {
        match self.cached_parsers.entry(extension.to_lowercase()) {
            Entry::Occupied(slot) => {
                log::debug!("reusing cached parser for '{}'", slot.key());
                Ok(&**slot.into_mut())
            }
            Entry::Vacant(slot) => {
                let entry = self
                    .parsers
                    .iter()
                    .find(|entry| entry.claims(slot.key()))
                    .ok_or_else(|| Error::UnsupportedExtension {
                        extension: extension.to_string(),
                        kind: FormatKind::Parse,
                    })?;
                log::debug!("instantiating parser for '{}'", slot.key());
                Ok(&**slot.insert(entry.build()))
            }
        }
    }

    /// Returns a fresh dumper for `extension`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedExtension`] if no entry claims the
    /// extension.
    pub fn resolve_dumper(&self, extension: &str) -> Result<Box<dyn Dumper>> {
        let key = extension.to_lowercase();
        self.dumpers
            .iter()
            .find(|entry| entry.claims(&key))
            .map(FormatEntry::build)
            .ok_or_else(|| Error::UnsupportedExtension {
                extension: extension.to_string(),
                kind: FormatKind::Dump,
            })
    }

    /// Returns true if a parser has already been built for `extension`.
    #[must_use]
    pub fn is_parser_cached(&self, extension: &str) -> bool {
        self.cached_parsers.contains_key(&extension.to_lowercase())
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cached: Vec<_> = self.cached_parsers.keys().collect();
        cached.sort();
        f.debug_struct("FormatRegistry")
            .field("parsers", &self.parsers)
            .field("dumpers", &self.dumpers)
            .field("cached_parsers", &cached)
            .finish()
    }
}
