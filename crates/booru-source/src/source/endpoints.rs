//! Flat, line-oriented endpoint lists.
//!
//! Lists are stored one URL per line. Blank lines are ignored when reading
//! and lines are joined with `\r\n` when writing. Edits keep the other lines
//! as they are, only dropping `\r` and blank lines.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::plugin_dir::{PluginDir, ENDPOINTS_FILE};
use crate::error::{Result, SourceError};

const LINE_SEPARATOR: &str = "\r\n";

/// Parse a list file's contents, skipping blank lines
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.replace('\r', "")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a list file for editing: unlike [`parse_list`] lines are not trimmed
fn split_lines(raw: &str) -> Vec<String> {
    raw.replace('\r', "")
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a list file; a missing or unreadable file is an empty list
pub fn read_list(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(raw) => parse_list(&raw),
        Err(e) => {
            log::trace!("Could not read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// The endpoints a source is configured to serve
#[derive(Debug, Clone)]
pub struct EndpointList {
    dir: PluginDir,
    urls: Vec<String>,
}

impl EndpointList {
    /// Load the list from a plugin directory
    pub fn load(dir: PluginDir) -> Self {
        let urls = read_list(&dir.read_path(ENDPOINTS_FILE));
        Self { dir, urls }
    }

    /// URLs as last read from or written to disk
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Add an endpoint.
    ///
    /// Re-reads the persisted list, inserts `url`, then writes it back
    /// deduplicated and sorted. Adding an existing URL leaves the list
    /// unchanged. On error nothing is modified.
    pub fn add(&mut self, url: &str) -> Result<()> {
        let mut urls: BTreeSet<String> = self.read_persisted()?.into_iter().collect();
        urls.insert(url.to_string());

        let urls: Vec<String> = urls.into_iter().collect();
        self.persist(&urls)?;

        log::debug!("Added endpoint {} to {}", url, self.dir.disk_name());
        self.urls = urls;
        Ok(())
    }

    /// Remove every occurrence of an endpoint.
    ///
    /// Re-reads the persisted list and writes it back without `url`, keeping
    /// the order of the other entries. On error nothing is modified.
    pub fn remove(&mut self, url: &str) -> Result<()> {
        let mut urls = self.read_persisted()?;
        urls.retain(|u| u != url);
        self.persist(&urls)?;

        log::debug!("Removed endpoint {} from {}", url, self.dir.disk_name());
        self.urls = urls;
        Ok(())
    }

    fn read_persisted(&self) -> Result<Vec<String>> {
        let path = self.dir.read_path(ENDPOINTS_FILE);
        let raw = fs::read_to_string(&path).map_err(|e| SourceError::Persistence {
            reason: format!("failed to read: {}", e),
            path,
        })?;
        Ok(split_lines(&raw))
    }

    /// Replace the list file in one step so a failed write leaves the
    /// previous contents in place.
    ///
    /// The new file takes the permissions of the list it replaces, and a
    /// symlinked list is written through to its target.
    fn persist(&self, urls: &[String]) -> Result<()> {
        let path = self.dir.prepare_write(ENDPOINTS_FILE).map_err(|e| SourceError::Persistence {
            path: self.dir.write_path(ENDPOINTS_FILE),
            reason: format!("failed to write: {}", e),
        })?;
        let target = fs::canonicalize(&path).unwrap_or(path);
        let failure = |e: std::io::Error| SourceError::Persistence {
            path: target.clone(),
            reason: format!("failed to write: {}", e),
        };

        let parent = target.parent().unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(parent).map_err(failure)?;
        if let Ok(metadata) = fs::metadata(self.dir.read_path(ENDPOINTS_FILE)) {
            file.as_file().set_permissions(metadata.permissions()).map_err(failure)?;
        }
        file.write_all(urls.join(LINE_SEPARATOR).as_bytes()).map_err(failure)?;
        file.persist(&target).map_err(|e| failure(e.error))?;
        Ok(())
    }
}
