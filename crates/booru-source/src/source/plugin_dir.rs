use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Declarative model of a source
pub const MODEL_FILE: &str = "model.js";
/// User-editable list of endpoints served by a source
pub const ENDPOINTS_FILE: &str = "sites.txt";
/// Read-only list of endpoints known to work with a source
pub const SUPPORTED_FILE: &str = "supported.txt";

/// Directory of one source plugin.
///
/// Files are read from the user override directory when present there and
/// from the install directory otherwise. Writes always go to the override
/// directory so installed plugins are never modified in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDir {
    read_root: PathBuf,
    write_root: PathBuf,
}

impl PluginDir {
    pub fn new(read_root: impl Into<PathBuf>, write_root: impl Into<PathBuf>) -> Self {
        Self {
            read_root: read_root.into(),
            write_root: write_root.into(),
        }
    }

    /// A directory that is both read from and written to
    pub fn single(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::new(root.clone(), root)
    }

    pub fn read_root(&self) -> &Path {
        &self.read_root
    }

    pub fn write_root(&self) -> &Path {
        &self.write_root
    }

    /// Name of the install directory, used to identify the source
    pub fn disk_name(&self) -> String {
        self.read_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn read_path(&self, file: &str) -> PathBuf {
        let overridden = self.write_root.join(file);
        if overridden.exists() {
            return overridden;
        }
        self.read_root.join(file)
    }

    pub fn write_path(&self, file: &str) -> PathBuf {
        self.write_root.join(file)
    }

    /// Resolve a write path, creating the override directory if needed
    pub fn prepare_write(&self, file: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.write_root)?;
        Ok(self.write_path(file))
    }
}
