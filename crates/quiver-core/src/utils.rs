use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds.
// u128 millis fits in u64 for realistic timestamps (until year 584942417)
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Modification time of a file in milliseconds since the epoch, `None` if it
/// cannot be stat'ed.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn mtime_millis(path: &Path) -> Option<u64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(
        modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    )
}

/// Everything up to the first space, or the whole string.
#[must_use]
pub fn first_word(input: &str) -> &str {
    input.split(' ').next().unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_reasonable() {
        assert!(now_millis() > 1_700_000_000_000, "Timestamp should be after 2023");
    }

    #[test]
    fn test_mtime_missing_file() {
        assert!(mtime_millis(Path::new("/nonexistent/quiver/file")).is_none());
    }

    #[test]
    fn test_mtime_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(mtime_millis(file.path()).is_some());
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word("run top"), "run");
        assert_eq!(first_word("firefox"), "firefox");
        assert_eq!(first_word(""), "");
        assert_eq!(first_word("a b c"), "a");
        assert_eq!(first_word("trailing "), "trailing");
    }
}
