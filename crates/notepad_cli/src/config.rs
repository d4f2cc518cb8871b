//! Filesystem locations used by the CLI.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "notepad";
const DB_FILE_NAME: &str = "notes.sqlite3";

/// Resolved database, log and export locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl AppPaths {
    /// Locations under the platform data directory, falling back to the
    /// current directory when the platform reports none.
    pub fn resolve() -> Self {
        let base = dirs::data_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);
        Self::from_base(base)
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self {
            db_path: base.join(DB_FILE_NAME),
            log_dir: base.join("logs"),
            export_dir: base.join("exports"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppPaths;
    use std::path::PathBuf;

    #[test]
    fn from_base_places_everything_under_base() {
        let paths = AppPaths::from_base(PathBuf::from("/tmp/notepad-test"));
        assert_eq!(paths.db_path, PathBuf::from("/tmp/notepad-test/notes.sqlite3"));
        assert_eq!(paths.log_dir, PathBuf::from("/tmp/notepad-test/logs"));
        assert_eq!(paths.export_dir, PathBuf::from("/tmp/notepad-test/exports"));
    }

    #[test]
    fn resolve_ends_with_app_dir() {
        let paths = AppPaths::resolve();
        assert!(paths.db_path.parent().unwrap().ends_with("notepad"));
        assert!(paths.log_dir.starts_with(paths.db_path.parent().unwrap()));
    }
}
