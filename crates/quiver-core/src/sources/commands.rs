//! The user's command list (`commands.json`).
//!
//! ```json
//! {
//!   "Run in Terminal": { "exec": "x-terminal-emulator -e", "icon": "utilities-terminal" }
//! }
//! ```

use crate::Result;
use crate::action::{ActionFields, Runner, command_key};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// One named shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    pub exec: String,
    pub icon: String,
}

impl CommandEntry {
    #[must_use]
    pub fn key(&self) -> String {
        command_key(&self.name)
    }

    #[must_use]
    pub fn to_fields(&self, show_icons: bool) -> ActionFields {
        ActionFields {
            display_name: self.name.clone(),
            match_hint: self.exec.clone(),
            icon_ref: if show_icons {
                self.icon.clone()
            } else {
                String::new()
            },
            source_time: 0,
            runner: Runner::RunCommand {
                command: self.exec.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommandDef {
    exec: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    icon: String,
}

/// Parse command list JSON. Entries with an empty command are dropped.
///
/// # Errors
///
/// Returns an error if `content` is not a JSON object of command definitions.
pub fn parse(content: &str) -> Result<Vec<CommandEntry>> {
    let defs: BTreeMap<String, CommandDef> = serde_json::from_str(content)?;
    Ok(defs
        .into_iter()
        .filter(|(name, def)| {
            let keep = !name.is_empty() && !def.exec.trim().is_empty();
            if !keep {
                debug!("Skipping command {:?} without exec", name);
            }
            keep
        })
        .map(|(name, def)| CommandEntry {
            name,
            exec: def.exec,
            icon: def.icon,
        })
        .collect())
}

/// Read the command list. A missing, unreadable or malformed file yields no
/// entries.
#[must_use]
pub fn load(path: &Path) -> Vec<CommandEntry> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("No command list at {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match parse(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Ignoring malformed command list {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Create the command list with an example entry if it does not exist yet.
/// Returns true if a file was written.
///
/// # Errors
///
/// Returns an error if the file or its parent directory cannot be created.
pub fn write_template(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut defs = BTreeMap::new();
    defs.insert(
        "Run in Terminal".to_string(),
        CommandDef {
            exec: "x-terminal-emulator -e".to_string(),
            icon: "utilities-terminal".to_string(),
        },
    );
    std::fs::write(path, serde_json::to_string_pretty(&defs)?)?;
    info!("Created command list at {}", path.display());
    Ok(true)
}
