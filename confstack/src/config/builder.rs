//! Builder for [`Config`] instances with custom adapters.

use crate::config::facade::Config;
use crate::config::loader::Source;
use crate::error::Result;
use crate::registry::{DumperEntry, ParserEntry};

/// Assembles a [`Config`] whose custom adapters are in place before the
/// first file is loaded.
///
/// # Examples
///
/// ```no_run
/// use confstack::format::{TomlDumper, TomlParser};
/// use confstack::{ConfigBuilder, DumperEntry, ParserEntry};
///
/// let config = ConfigBuilder::new()
///     .with_parser(ParserEntry::of::<TomlParser, _, _>(["toml"]))
///     .with_dumper(DumperEntry::of::<TomlDumper, _, _>(["toml"]))
///     .with_source("config/app.toml")
///     .with_source("config/local.yml")
///     .build()
///     .unwrap();
///
/// println!("{}", config.dump("toml").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    parsers: Vec<ParserEntry>,
    dumpers: Vec<DumperEntry>,
    sources: Vec<Source>,
}

impl ConfigBuilder {
    /// Creates a builder with no extra adapters and no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parser entry. Entries added earlier win over later ones.
    #[must_use]
    pub fn with_parser(mut self, entry: ParserEntry) -> Self {
        self.parsers.push(entry);
        self
    }

    /// Adds several parser entries.
    #[must_use]
    pub fn with_parsers<I: IntoIterator<Item = ParserEntry>>(mut self, entries: I) -> Self {
        self.parsers.extend(entries);
        self
    }

    /// Adds a dumper entry. Entries added earlier win over later ones.
    #[must_use]
    pub fn with_dumper(mut self, entry: DumperEntry) -> Self {
        self.dumpers.push(entry);
        self
    }

    /// Adds several dumper entries.
    #[must_use]
    pub fn with_dumpers<I: IntoIterator<Item = DumperEntry>>(mut self, entries: I) -> Self {
        self.dumpers.extend(entries);
        self
    }

    /// Queues a source to load; sources load in the order they were added.
    #[must_use]
    pub fn with_source<S: Into<Source>>(mut self, source: S) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Builds the configuration and loads the queued sources.
    ///
    /// # Errors
    ///
    /// Returns an error if loading any source fails.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::new();
        config.add_parsers(self.parsers).add_dumpers(self.dumpers);
        if !self.sources.is_empty() {
            config.add(Source::List(self.sources))?;
        }
        Ok(config)
    }
}
