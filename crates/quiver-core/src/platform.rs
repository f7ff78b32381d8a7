//! Desktop environment detection
//!
//! Determines which desktop session is running so desktop entries restricted
//! with `OnlyShowIn`/`NotShowIn` can be filtered.

use std::env;

/// Names of the current desktop session, as listed in `XDG_CURRENT_DESKTOP`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEnvironment {
    names: Vec<String>,
}

impl DesktopEnvironment {
    /// Detect from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        env::var("XDG_CURRENT_DESKTOP")
            .map(|value| Self::from_list(&value))
            .unwrap_or_default()
    }

    /// Parse a colon-separated desktop list such as `ubuntu:GNOME`.
    #[must_use]
    pub fn from_list(value: &str) -> Self {
        Self {
            names: split_list(value, ':'),
        }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether an entry with the given `OnlyShowIn` and `NotShowIn` values
    /// (semicolon-separated) should be shown in this session.
    #[must_use]
    pub fn allows(&self, only_show_in: Option<&str>, not_show_in: Option<&str>) -> bool {
        if let Some(only) = only_show_in {
            let only = split_list(only, ';');
            if !only.is_empty() && !only.iter().any(|name| self.names.contains(name)) {
                return false;
            }
        }

        if let Some(not) = not_show_in {
            let not = split_list(not, ';');
            if not.iter().any(|name| self.names.contains(name)) {
                return false;
            }
        }

        true
    }
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
