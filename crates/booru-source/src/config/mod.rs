//! Loader configuration
//!
//! Source plugins live in two places: an install directory, which is only
//! read, and a user directory where edited files (such as endpoint lists)
//! are written. Both are resolved in this order:
//!
//! 1. Explicitly set values (command line)
//! 2. Environment variables (`BOORU_SOURCES_DIR`, `BOORU_USER_DIR`)
//! 3. Platform defaults (`<data dir>/booru/sites`, `<config dir>/booru/sites`)
//!
//! # Example
//!
//! ```rust,no_run
//! use booru_source::config::LoaderConfig;
//!
//! let config = LoaderConfig::build(true);
//! println!("Sources: {:?} ({})", config.sources_dir, config.sources_dir_source.as_str());
//!
//! let dir = config.plugin_dir("Danbooru (2.0)");
//! println!("Model: {:?}", dir.read_path("model.js"));
//! ```

mod loader;

pub use loader::{ConfigLoader, ConfigSource, LoaderConfig, SOURCES_DIR_ENV, USER_DIR_ENV};
