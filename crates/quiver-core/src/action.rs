//! The launchable action model.
//!
//! An [`Action`] is one candidate the user can search for and run. Actions are
//! created by the reconciler (or at startup for built-ins), refreshed in place
//! when their source changes, and flipped inactive when the source goes away.
//! They are never removed while the process runs, so an [`ActionId`] stays
//! valid for the lifetime of the store.

use crate::utils::first_word;
use std::path::PathBuf;

/// Key namespace for entries from the command list.
pub const COMMAND_KEY_PREFIX: &str = "cmd:";

/// Stable handle into the action store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) usize);

impl ActionId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Functions provided by the launcher itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Quit,
    Settings,
    Commands,
    Refresh,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [
        Builtin::Quit,
        Builtin::Settings,
        Builtin::Commands,
        Builtin::Refresh,
    ];

    /// Literal key, also used as the display name.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Builtin::Quit => "quit quiver",
            Builtin::Settings => "quiver settings",
            Builtin::Commands => "quiver commands",
            Builtin::Refresh => "quiver refresh",
        }
    }

    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Builtin::Quit => "exit",
            Builtin::Settings => "config preferences",
            Builtin::Commands => "commands",
            Builtin::Refresh => "reload rescan",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Builtin::Quit => "application-exit",
            Builtin::Settings => "preferences-system",
            Builtin::Commands => "utilities-terminal",
            Builtin::Refresh => "view-refresh",
        }
    }
}

/// What happens when an action is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runner {
    /// Launch the program described by a desktop entry.
    Launch {
        desktop_file: PathBuf,
        exec: String,
    },
    /// Run a shell command; query text after the first space is appended.
    RunCommand { command: String },
    Builtin(Builtin),
}

/// Which source produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    DesktopEntry,
    Command,
    Builtin,
}

impl Runner {
    #[must_use]
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Runner::Launch { .. } => SourceKind::DesktopEntry,
            Runner::RunCommand { .. } => SourceKind::Command,
            Runner::Builtin(_) => SourceKind::Builtin,
        }
    }

    /// Backing desktop file for directory-sourced actions.
    #[must_use]
    pub fn desktop_file(&self) -> Option<&PathBuf> {
        match self {
            Runner::Launch { desktop_file, .. } => Some(desktop_file),
            _ => None,
        }
    }
}

/// One candidate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub key: String,
    /// Modification time (ms) of the backing definition, 0 when there is none.
    pub source_time: u64,
    pub display_name: String,
    /// Matched against but not displayed (executable name, command text).
    pub match_hint: String,
    /// First word of the query that last selected this action.
    pub mnemonic: String,
    /// Timestamp (ms) of the last selection, 0 if never used.
    pub last_used: u64,
    pub icon_ref: String,
    pub runner: Runner,
    pub active: bool,
}

impl Action {
    pub(crate) fn new(key: String, fields: ActionFields) -> Self {
        Self {
            key,
            source_time: fields.source_time,
            display_name: fields.display_name,
            match_hint: fields.match_hint,
            mnemonic: String::new(),
            last_used: 0,
            icon_ref: fields.icon_ref,
            runner: fields.runner,
            active: true,
        }
    }

    /// Replace source-owned fields, keeping usage history.
    pub(crate) fn refresh(&mut self, fields: ActionFields) {
        self.display_name = fields.display_name;
        self.match_hint = fields.match_hint;
        self.icon_ref = fields.icon_ref;
        self.source_time = fields.source_time;
        self.runner = fields.runner;
        self.active = true;
    }

    #[must_use]
    pub fn source_kind(&self) -> SourceKind {
        self.runner.source_kind()
    }
}

/// Source-owned fields written by `upsert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFields {
    pub display_name: String,
    pub match_hint: String,
    pub icon_ref: String,
    pub source_time: u64,
    pub runner: Runner,
}

impl ActionFields {
    #[must_use]
    pub fn builtin(builtin: Builtin) -> Self {
        Self {
            display_name: builtin.key().to_string(),
            match_hint: builtin.hint().to_string(),
            icon_ref: builtin.icon().to_string(),
            source_time: 0,
            runner: Runner::Builtin(builtin),
        }
    }
}

#[must_use]
pub fn command_key(name: &str) -> String {
    format!("{COMMAND_KEY_PREFIX}{name}")
}

/// A confirmed selection handed to whoever actually runs things.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub key: String,
    pub display_name: String,
    pub runner: Runner,
    /// Full query text at confirmation time.
    pub query: String,
}

impl Invocation {
    /// Shell command line to execute, `None` for built-ins.
    ///
    /// For commands, everything from the first space of the query on is
    /// appended verbatim, so `run top` against `xterm -e` yields `xterm -e top`.
    #[must_use]
    pub fn command_line(&self) -> Option<String> {
        match &self.runner {
            Runner::Launch { exec, .. } => Some(exec.clone()),
            Runner::RunCommand { command } => {
                let args = &self.query[first_word(&self.query).len()..];
                Some(format!("{command}{args}"))
            }
            Runner::Builtin(_) => None,
        }
    }

    #[must_use]
    pub fn builtin(&self) -> Option<Builtin> {
        match self.runner {
            Runner::Builtin(b) => Some(b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(runner: Runner, query: &str) -> Invocation {
        Invocation {
            key: "k".to_string(),
            display_name: "K".to_string(),
            runner,
            query: query.to_string(),
        }
    }

    #[test]
    fn test_command_line_appends_arguments() {
        let inv = invocation(
            Runner::RunCommand {
                command: "xterm -e".to_string(),
            },
            "run top",
        );
        assert_eq!(inv.command_line().as_deref(), Some("xterm -e top"));
    }

    #[test]
    fn test_command_line_without_arguments() {
        let inv = invocation(
            Runner::RunCommand {
                command: "xterm".to_string(),
            },
            "run",
        );
        assert_eq!(inv.command_line().as_deref(), Some("xterm"));
    }

    #[test]
    fn test_command_line_keeps_argument_spacing() {
        let inv = invocation(
            Runner::RunCommand {
                command: "echo".to_string(),
            },
            "say  two  spaces",
        );
        assert_eq!(inv.command_line().as_deref(), Some("echo  two  spaces"));
    }

    #[test]
    fn test_command_line_launch_ignores_query() {
        let inv = invocation(
            Runner::Launch {
                desktop_file: PathBuf::from("/usr/share/applications/firefox.desktop"),
                exec: "firefox".to_string(),
            },
            "fire fox",
        );
        assert_eq!(inv.command_line().as_deref(), Some("firefox"));
    }

    #[test]
    fn test_command_line_builtin_is_none() {
        let inv = invocation(Runner::Builtin(Builtin::Quit), "quit");
        assert!(inv.command_line().is_none());
        assert_eq!(inv.builtin(), Some(Builtin::Quit));
    }

    #[test]
    fn test_builtin_keys_unique() {
        let keys: std::collections::HashSet<_> = Builtin::ALL.iter().map(|b| b.key()).collect();
        assert_eq!(keys.len(), Builtin::ALL.len());
    }

    #[test]
    fn test_refresh_keeps_history() {
        let mut action = Action::new("k".to_string(), ActionFields::builtin(Builtin::Quit));
        action.mnemonic = "qu".to_string();
        action.last_used = 42;
        action.active = false;

        action.refresh(ActionFields::builtin(Builtin::Refresh));

        assert_eq!(action.mnemonic, "qu");
        assert_eq!(action.last_used, 42);
        assert!(action.active);
        assert_eq!(action.runner, Runner::Builtin(Builtin::Refresh));
    }

    #[test]
    fn test_command_key_namespace() {
        assert_eq!(command_key("Run in Terminal"), "cmd:Run in Terminal");
        assert!(!command_key("x").starts_with('/'));
    }
}
