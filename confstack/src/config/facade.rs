//! The layered configuration object.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::builder::ConfigBuilder;
use crate::config::loader::{extension_of, Source, SourceResolver};
use crate::config::merger::ConfigMerger;
use crate::config::tree::{ConfigTree, KeyPath};
use crate::error::Result;
use crate::registry::{DumperEntry, FormatRegistry, ParserEntry};

/// Configuration merged from any number of files.
///
/// Each call to [`add`](Self::add) resolves its sources into files, parses
/// them with the adapter registered for their extension and deep-merges the
/// result over what was loaded before.
///
/// # Examples
///
/// ```no_run
/// use confstack::Config;
///
/// let mut config = Config::from_sources(["config/defaults", "config/production.yml"])?;
/// config.add("config/local.ini")?;
///
/// let host = config.get_or("db.host", "localhost".into());
/// println!("{}", config.dump("json")?);
/// # Ok::<(), confstack::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Config {
    tree: ConfigTree,
    registry: FormatRegistry,
}

impl Config {
    /// Creates an empty configuration with the built-in adapters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration and loads `sources` into it.
    ///
    /// # Errors
    ///
    /// Returns an error if any source is missing or fails to parse.
    pub fn from_sources<S: Into<Source>>(sources: S) -> Result<Self> {
        let mut config = Self::new();
        config.add(sources)?;
        Ok(config)
    }

    /// Starts a [`ConfigBuilder`].
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Loads `sources` and merges them over the current tree.
    ///
    /// All sources are resolved to files before anything is parsed, so a
    /// missing path leaves the tree untouched. A parse failure stops the
    /// call; files merged before the failing one stay merged.
    ///
    /// # Errors
    ///
    /// Returns an error if a path does not exist, an extension has no
    /// parser, or a file fails to parse.
    pub fn add<S: Into<Source>>(&mut self, sources: S) -> Result<&mut Self> {
        let files = SourceResolver::resolve(&sources.into())?;
        log::debug!("loading {} configuration file(s)", files.len());

        for file in files {
            let extension = extension_of(&file);
            let parser = self.registry.resolve_parser(&extension)?;
            log::debug!("parsing {} as '{extension}'", file.display());
            let document = parser.parse(&file)?;
            ConfigMerger::merge_into(self.tree.all_mut(), ConfigMerger::into_tree(document));
        }

        Ok(self)
    }

    /// Registers parsers ahead of the existing ones.
    ///
    /// Only extensions that have not been parsed yet are affected.
    pub fn add_parsers<I: IntoIterator<Item = ParserEntry>>(&mut self, entries: I) -> &mut Self {
        self.registry.add_parsers(entries);
        self
    }

    /// Registers dumpers ahead of the existing ones.
    pub fn add_dumpers<I: IntoIterator<Item = DumperEntry>>(&mut self, entries: I) -> &mut Self {
        self.registry.add_dumpers(entries);
        self
    }

    /// Serializes the whole tree in the format registered for `extension`.
    ///
    /// # Errors
    ///
    /// Returns an error if no dumper claims `extension` or the dumper fails.
    pub fn dump(&self, extension: &str) -> Result<String> {
        let dumper = self.registry.resolve_dumper(extension)?;
        dumper.dump(self.tree.all())
    }

    /// Looks up the value at `path`.
    pub fn get<P: Into<KeyPath>>(&self, path: P) -> Option<&Value> {
        self.tree.get(path)
    }

    /// Looks up the value at `path`, falling back to `default`.
    pub fn get_or<P: Into<KeyPath>>(&self, path: P, default: Value) -> Value {
        self.tree.get_or(path, default)
    }

    /// Deserializes the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value does not fit `T`.
    pub fn get_as<T, P>(&self, path: P) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        P: Into<KeyPath>,
    {
        self.tree.get_as(path)
    }

    /// Returns true if a value is stored at `path`.
    pub fn has<P: Into<KeyPath>>(&self, path: P) -> bool {
        self.tree.has(path)
    }

    /// Stores `value` at `path`, creating intermediate maps.
    pub fn set<P: Into<KeyPath>>(&mut self, path: P, value: Value) -> &mut Self {
        self.tree.set(path, value);
        self
    }

    /// The whole merged tree.
    #[must_use]
    pub fn all(&self) -> &Map<String, Value> {
        self.tree.all()
    }

    /// The adapter registry in use.
    #[must_use]
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }
}
