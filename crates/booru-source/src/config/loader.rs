use std::env;
use std::path::PathBuf;

use crate::source::PluginDir;

pub const SOURCES_DIR_ENV: &str = "BOORU_SOURCES_DIR";
pub const USER_DIR_ENV: &str = "BOORU_USER_DIR";

/// Represents the origin of a configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default built-in value
    Default,
    /// From environment variable
    Environment(String),
    /// Programmatically set
    Command,
}

impl ConfigSource {
    pub fn as_str(&self) -> &str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::Environment(var) => var,
            ConfigSource::Command => "command",
        }
    }
}

/// Resolves loader directories from the environment and platform defaults
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Get a BOORU_* environment variable, ignoring empty values
    pub fn get_env(&self, var: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("", "", "booru")
    }

    /// Directory holding installed source plugins
    pub fn get_sources_dir(&self) -> (PathBuf, ConfigSource) {
        if let Some(dir) = self.get_env(SOURCES_DIR_ENV) {
            return (PathBuf::from(dir), ConfigSource::Environment(SOURCES_DIR_ENV.to_string()));
        }

        let dir = match Self::project_dirs() {
            Some(dirs) => dirs.data_dir().join("sites"),
            None => PathBuf::from("sites"),
        };
        (dir, ConfigSource::Default)
    }

    /// Directory holding per-user overrides of plugin files
    pub fn get_user_dir(&self) -> (PathBuf, ConfigSource) {
        if let Some(dir) = self.get_env(USER_DIR_ENV) {
            return (PathBuf::from(dir), ConfigSource::Environment(USER_DIR_ENV.to_string()));
        }

        let dir = match Self::project_dirs() {
            Some(dirs) => dirs.config_dir().join("sites"),
            None => PathBuf::from("sites"),
        };
        (dir, ConfigSource::Default)
    }
}

/// Where source plugins are loaded from and where edits are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub sources_dir: PathBuf,
    pub user_dir: PathBuf,
    pub sources_dir_source: ConfigSource,
    pub user_dir_source: ConfigSource,
}

impl LoaderConfig {
    /// Resolve directories from environment variables (if enabled) and
    /// platform defaults
    pub fn build(use_environment: bool) -> Self {
        let loader = ConfigLoader::new(use_environment);
        let (sources_dir, sources_dir_source) = loader.get_sources_dir();
        let (user_dir, user_dir_source) = loader.get_user_dir();

        Self {
            sources_dir,
            user_dir,
            sources_dir_source,
            user_dir_source,
        }
    }

    /// Explicit directories, bypassing environment and defaults
    pub fn with_dirs(sources_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources_dir: sources_dir.into(),
            user_dir: user_dir.into(),
            sources_dir_source: ConfigSource::Command,
            user_dir_source: ConfigSource::Command,
        }
    }

    pub fn set_sources_dir(&mut self, dir: impl Into<PathBuf>) {
        self.sources_dir = dir.into();
        self.sources_dir_source = ConfigSource::Command;
    }

    pub fn set_user_dir(&mut self, dir: impl Into<PathBuf>) {
        self.user_dir = dir.into();
        self.user_dir_source = ConfigSource::Command;
    }

    /// Plugin directory of the source named `disk_name`
    pub fn plugin_dir(&self, disk_name: &str) -> PluginDir {
        PluginDir::new(self.sources_dir.join(disk_name), self.user_dir.join(disk_name))
    }
}
