//! Desktop entry (`*.desktop`) parsing.

use crate::action::{ActionFields, Runner};
use crate::platform::DesktopEnvironment;
use crate::utils::mtime_millis;
use freedesktop_desktop_entry::DesktopEntry;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One parsed launcher definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherRecord {
    pub path: PathBuf,
    pub display_name: String,
    /// `Exec` line with field codes removed.
    pub exec: String,
    /// Basename of the program `exec` runs.
    pub executable_hint: String,
    pub icon_ref: String,
    pub hidden: bool,
    pub should_show: bool,
    pub mtime: u64,
}

impl LauncherRecord {
    /// Only shown, non-hidden entries become actions.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.should_show && !self.hidden
    }

    #[must_use]
    pub fn key(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    #[must_use]
    pub fn to_fields(&self, match_executable: bool, show_icons: bool) -> ActionFields {
        ActionFields {
            display_name: self.display_name.clone(),
            match_hint: if match_executable {
                self.executable_hint.clone()
            } else {
                String::new()
            },
            icon_ref: if show_icons {
                self.icon_ref.clone()
            } else {
                String::new()
            },
            source_time: self.mtime,
            runner: Runner::Launch {
                desktop_file: self.path.clone(),
                exec: self.exec.clone(),
            },
        }
    }
}

/// Whether `path` names a desktop entry file (suffix match ignores case).
#[must_use]
pub fn is_desktop_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("desktop"))
}

/// Read and parse one desktop file. `None` if it cannot be read or lacks
/// `Name`/`Exec`.
#[must_use]
pub fn load(path: &Path, desktop: &DesktopEnvironment) -> Option<LauncherRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };
    let mtime = mtime_millis(path)?;
    parse(path, &content, mtime, desktop)
}

/// Parse desktop entry text already read from `path`.
#[must_use]
pub fn parse(
    path: &Path,
    content: &str,
    mtime: u64,
    desktop: &DesktopEnvironment,
) -> Option<LauncherRecord> {
    // The app id is taken from the file name and only a lowercase suffix is
    // accepted there; the record keeps the real path.
    let id_path = path.with_extension("desktop");
    let de = match DesktopEntry::from_str(&id_path, content, None::<&[&str]>) {
        Ok(de) => de,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };

    let locales: &[&str] = &[];
    let display_name = de.name(locales)?.trim().to_string();
    if display_name.is_empty() {
        return None;
    }

    let exec = strip_field_codes(de.exec()?);
    if exec.is_empty() {
        return None;
    }

    let is_application = de
        .desktop_entry("Type")
        .is_none_or(|kind| kind.trim() == "Application");
    let hidden = de.desktop_entry("Hidden").is_some_and(parse_bool);
    let should_show = is_application
        && !de.no_display()
        && desktop.allows(de.desktop_entry("OnlyShowIn"), de.desktop_entry("NotShowIn"));

    Some(LauncherRecord {
        path: path.to_path_buf(),
        executable_hint: executable_name(&exec),
        icon_ref: de.icon().unwrap_or_default().to_string(),
        display_name,
        exec,
        hidden,
        should_show,
        mtime,
    })
}

/// Remove `%f`, `%U` and friends; `%%` becomes a literal `%`.
fn strip_field_codes(exec: &str) -> String {
    exec.split_whitespace()
        .filter_map(|token| {
            if token == "%%" {
                Some("%".to_string())
            } else if token.len() == 2 && token.starts_with('%') {
                None
            } else {
                Some(token.replace("%%", "%"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn executable_name(exec: &str) -> String {
    let program = exec.split_whitespace().next().unwrap_or_default();
    let program = program.trim_matches('"');
    Path::new(program)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
