pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod registry;
pub mod runtime;
pub mod source;

pub use auth::{Auth, AuthField};
pub use config::LoaderConfig;
pub use document::Document;
pub use error::{Result, SourceError};
pub use registry::SourceRegistry;
pub use runtime::{EvaluationError, JsonModelRuntime, ScriptRuntime, SharedRuntime};
pub use source::{Api, PluginDir, Source, SourceDefinition, TagNameFormat};
