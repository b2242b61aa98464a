#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # confstack
//!
//! Layered configuration for applications that keep their settings in
//! several files and formats.
//!
//! Files, directories and nested lists of both are loaded in order and
//! deep-merged into one tree, which can then be queried by key path or
//! written back out in any registered format.
//!
//! ## Core Types
//!
//! - [`Config`]: the merged configuration and its accessors
//! - [`ConfigBuilder`]: set up custom adapters before the first load
//! - [`Source`] and [`SourceResolver`]: what to load and in which order
//! - [`FormatRegistry`], [`ParserEntry`], [`DumperEntry`]: extension dispatch
//! - [`format::Parser`] and [`format::Dumper`]: the adapter traits
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Supported Formats
//!
//! JSON, YAML, INI and PHP literal arrays can be read and written; XML can
//! be read. TOML adapters are available but must be registered.
//!
//! ## Examples
//!
//! ```
//! use confstack::Config;
//! use serde_json::json;
//!
//! let mut config = Config::new();
//! config.set("db.host", json!("localhost"));
//! config.set("db.port", json!(5432));
//!
//! assert_eq!(config.get("db.port"), Some(&json!(5432)));
//! assert!(config.dump("yml").unwrap().contains("host: localhost"));
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod registry;

// Re-export key types at crate root for convenience
pub use config::{
    Config, ConfigBuilder, ConfigMerger, ConfigTree, KeyPath, Source, SourceResolver,
};
pub use error::{Error, FormatKind, Result};
pub use registry::{DumperEntry, FormatEntry, FormatRegistry, ParserEntry};
