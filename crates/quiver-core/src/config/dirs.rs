use crate::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following the XDG base directory layout
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/quiver)
    pub config: PathBuf,

    /// Data directory (~/.local/share/quiver)
    pub data: PathBuf,

    /// Config file path
    pub config_file: PathBuf,

    /// User-edited list of named shell commands
    pub commands_file: PathBuf,

    /// Persisted mnemonics and last-used times
    pub usage_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the system's project directories cannot be
    /// determined (no home directory).
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "quiver")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;

        let config = project.config_dir().to_path_buf();
        let data = project.data_dir().to_path_buf();

        Ok(Self {
            config_file: config.join("config.json"),
            commands_file: config.join("commands.json"),
            usage_file: data.join("usage.json"),
            config,
            data,
        })
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            commands_file: base.join("commands.json"),
            usage_file: base.join("usage.json"),
            config: base.clone(),
            data: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        Ok(())
    }
}
