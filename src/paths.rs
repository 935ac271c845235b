use std::path::PathBuf;
use std::sync::OnceLock;

use crate::history::DEFAULT_HISTORY_FILE;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the OCR debug capture directory: `<exe_dir>/debug/`
pub fn get_debug_dir() -> PathBuf {
    get_exe_dir().join("debug")
}

/// Returns the default match history database: `<exe_dir>/match_history.db`
pub fn get_history_path() -> PathBuf {
    get_exe_dir().join(DEFAULT_HISTORY_FILE)
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    std::fs::create_dir_all(get_debug_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_live_next_to_executable() {
        let exe_dir = get_exe_dir();
        assert_eq!(get_logs_dir().parent(), Some(exe_dir.as_path()));
        assert_eq!(get_debug_dir().parent(), Some(exe_dir.as_path()));
        assert!(get_history_path().ends_with("match_history.db"));
    }
}
