use crate::Result;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub icons: IconsConfig,

    /// Command used to open config files. Falls back to a desktop opener chain.
    #[serde(default)]
    pub editor: Option<String>,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesConfig {
    #[serde(default = "default_application_dirs")]
    pub application_dirs: Vec<PathBuf>,

    /// Match against the executable name of desktop entries, not only the
    /// display name.
    #[serde(default = "default_true")]
    pub match_executable: bool,
}

impl SourcesConfig {
    /// Application directories with a leading `~` expanded.
    #[must_use]
    pub fn resolved_application_dirs(&self) -> Vec<PathBuf> {
        self.application_dirs
            .iter()
            .map(|dir| expand_home(dir))
            .collect()
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            application_dirs: default_application_dirs(),
            match_executable: true,
        }
    }
}

fn default_application_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/share/applications"),
        PathBuf::from("/usr/local/share/applications"),
        PathBuf::from("~/.local/share/applications"),
    ]
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    /// Characters beyond this are ignored.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    20
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconsConfig {
    #[serde(default = "default_true")]
    pub show: bool,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self { show: true }
    }
}

/// Expand a leading `~` to the user's home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(base) => base.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
