//! Source plugins
//!
//! A source is a directory holding a declarative model plus endpoint lists:
//!
//! ```text
//! sites/
//! └── Danbooru (2.0)/
//!     ├── model.js        # export var source = { name, tokens, apis, tagFormat, auth }
//!     ├── sites.txt       # endpoints served by this source, one per line
//!     └── supported.txt   # endpoints known to work, one per line
//! ```
//!
//! Loading a source never fails. A broken plugin still yields a [`Source`],
//! with an empty name and no APIs, and the reason available through
//! [`Source::load_error`].

mod api;
mod definition;
mod endpoints;
mod plugin_dir;
mod tag_format;

pub use api::Api;
pub use definition::SourceDefinition;
pub use endpoints::{parse_list, read_list, EndpointList};
pub use plugin_dir::{PluginDir, ENDPOINTS_FILE, MODEL_FILE, SUPPORTED_FILE};
pub use tag_format::{CaseFormat, TagNameFormat};

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;

use crate::auth::Auth;
use crate::error::{Result, SourceError};
use crate::runtime::{wrap_model_source, SharedRuntime};

/// A loaded source plugin
#[derive(Debug)]
pub struct Source {
    dir: PluginDir,
    disk_name: String,
    definition: SourceDefinition,
    endpoints: EndpointList,
    supported_endpoints: Vec<String>,
    load_error: Option<SourceError>,
    runtime: SharedRuntime,
}

impl Source {
    /// Load and compile the plugin stored in `dir`
    pub fn load(dir: PluginDir, runtime: &SharedRuntime) -> Self {
        let disk_name = dir.disk_name();
        let (definition, load_error) = match Self::compile_model(&dir, &disk_name, runtime) {
            Ok(definition) => (definition, None),
            Err(err) => (SourceDefinition::default(), Some(err)),
        };

        let endpoints = EndpointList::load(dir.clone());
        if endpoints.is_empty() {
            log::debug!("No site for source {}", definition.name);
        }
        let supported_endpoints = read_list(&dir.read_path(SUPPORTED_FILE));

        Self {
            dir,
            disk_name,
            definition,
            endpoints,
            supported_endpoints,
            load_error,
            runtime: runtime.clone(),
        }
    }

    fn compile_model(dir: &PluginDir, disk_name: &str, runtime: &SharedRuntime) -> Result<SourceDefinition> {
        let model_path = dir.read_path(MODEL_FILE);

        // Read before evaluating so the runtime lock is never held during IO
        let text = match fs::read_to_string(&model_path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Javascript model not found for '{}' in '{}'", disk_name, model_path.display());
                return Err(SourceError::MissingDefinition {
                    disk_name: disk_name.to_string(),
                    path: model_path,
                });
            }
            Err(e) => {
                log::warn!("Could not read Javascript model '{}': {}", model_path.display(), e);
                return Err(SourceError::Io(e));
            }
        };
        log::debug!("Using Javascript model for {}", disk_name);

        let doc = runtime
            .evaluate(&wrap_model_source(&text), &model_path.to_string_lossy())
            .map_err(|e| {
                log::error!("Uncaught exception at line {}: {}", e.line, e.message);
                SourceError::from(e)
            })?;

        let definition = SourceDefinition::from_document(&doc);
        if definition.apis.is_empty() {
            log::info!("No valid source has been found in the model.js file from {}.", definition.name);
        }
        Ok(definition)
    }

    /// Model name, empty if the model could not be loaded
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Identifier derived from the plugin directory name
    pub fn disk_name(&self) -> &str {
        &self.disk_name
    }

    pub fn dir(&self) -> &PluginDir {
        &self.dir
    }

    pub fn definition(&self) -> &SourceDefinition {
        &self.definition
    }

    pub fn apis(&self) -> &[Api] {
        &self.definition.apis
    }

    /// Look up an API by identifier
    pub fn api(&self, name: &str) -> Option<&Api> {
        self.definition.apis.iter().find(|api| api.name() == name)
    }

    pub fn tag_name_format(&self) -> &TagNameFormat {
        &self.definition.tag_name_format
    }

    pub fn additional_tokens(&self) -> &[String] {
        &self.definition.additional_tokens
    }

    pub fn auths(&self) -> &BTreeMap<String, Auth> {
        &self.definition.auths
    }

    pub fn auth(&self, id: &str) -> Option<&Auth> {
        self.definition.auths.get(id)
    }

    pub fn endpoints(&self) -> &EndpointList {
        &self.endpoints
    }

    /// Persist a new endpoint for this source
    pub fn add_endpoint(&mut self, url: &str) -> Result<()> {
        self.endpoints.add(url)
    }

    /// Remove an endpoint from this source
    pub fn remove_endpoint(&mut self, url: &str) -> Result<()> {
        self.endpoints.remove(url)
    }

    pub fn supported_endpoints(&self) -> &[String] {
        &self.supported_endpoints
    }

    /// Why the model could not be used, if it could not
    pub fn load_error(&self) -> Option<&SourceError> {
        self.load_error.as_ref()
    }

    /// Whether the source can serve requests at all
    pub fn is_usable(&self) -> bool {
        self.load_error.is_none() && !self.definition.apis.is_empty()
    }

    /// Runtime shared with the APIs of this source
    pub fn runtime(&self) -> &SharedRuntime {
        &self.runtime
    }
}
