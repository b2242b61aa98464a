//! Layered configuration loading.
//!
//! Sources are resolved into files, each file is parsed by the adapter
//! registered for its extension, and the results are deep-merged in order.
//!
//! # Merge Precedence
//!
//! Later files override earlier ones:
//!
//! 1. Files added by later `add` calls
//! 2. Later entries of the same source list
//! 3. Within a directory, files later in name order
//!
//! Maps are merged key by key. Scalars and lists are replaced wholesale.
//!
//! # Examples
//!
//! ```no_run
//! use confstack::config::Config;
//!
//! let mut config = Config::new();
//! config
//!     .add(["config/defaults", "config/production.yml"])?
//!     .add("config/local.php")?;
//!
//! assert!(config.has("db.host"));
//! # Ok::<(), confstack::Error>(())
//! ```

pub mod builder;
pub mod facade;
pub mod loader;
pub mod merger;
pub mod tree;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types at module root
pub use builder::ConfigBuilder;
pub use facade::Config;
pub use loader::{extension_of, Source, SourceResolver};
pub use merger::ConfigMerger;
pub use tree::{ConfigTree, KeyPath};
