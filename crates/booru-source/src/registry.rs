//! Loading every source plugin of a sources directory.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::time::Instant;

use tokio::task::JoinSet;

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::runtime::SharedRuntime;
use crate::source::Source;

/// All loaded sources, by disk name
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Source>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every plugin directory found in `config.sources_dir`.
    ///
    /// Directories are loaded concurrently on the blocking pool; their model
    /// evaluations are serialized by `runtime`. The order in which sources
    /// finish loading is unspecified.
    pub async fn load(config: &LoaderConfig, runtime: &SharedRuntime) -> Result<Self> {
        let start = Instant::now();
        let mut registry = Self::new();

        let mut entries = match tokio::fs::read_dir(&config.sources_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Sources directory {} does not exist", config.sources_dir.display());
                return Ok(registry);
            }
            Err(e) => return Err(e.into()),
        };

        let mut tasks = JoinSet::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    log::warn!("Stopped scanning {}: {}", config.sources_dir.display(), e);
                    break;
                }
            };
            let disk_name = entry.file_name().to_string_lossy().into_owned();
            if disk_name.starts_with('.') {
                continue;
            }

            // Follows symlinks so linked plugin directories are picked up
            match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) if metadata.is_dir() => {}
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            }

            let dir = config.plugin_dir(&disk_name);
            let runtime = runtime.clone();
            tasks.spawn_blocking(move || Source::load(dir, &runtime));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(source) => registry.insert(source),
                Err(e) => log::error!("Source loading task failed: {}", e),
            }
        }

        log::info!("Loaded {} sources in {:?}", registry.len(), start.elapsed());
        Ok(registry)
    }

    /// Add a source, replacing any previous one with the same disk name
    pub fn insert(&mut self, source: Source) {
        self.sources.insert(source.disk_name().to_string(), source);
    }

    pub fn get(&self, disk_name: &str) -> Option<&Source> {
        self.sources.get(disk_name)
    }

    pub fn get_mut(&mut self, disk_name: &str) -> Option<&mut Source> {
        self.sources.get_mut(disk_name)
    }

    /// Sources ordered by disk name
    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.values()
    }

    /// Sources whose model loaded and declares at least one API
    pub fn usable(&self) -> impl Iterator<Item = &Source> {
        self.iter().filter(|source| source.is_usable())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
