use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(windows)]
const EXECUTABLE_NAME: &str = "tesseract.exe";
#[cfg(not(windows))]
const EXECUTABLE_NAME: &str = "tesseract";

#[cfg(windows)]
const COMMON_PATHS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];
#[cfg(not(windows))]
const COMMON_PATHS: &[&str] = &[
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

/// Returns the per-user directory for a private Tesseract install
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dko-tracker")
        .join("tesseract")
}

/// Runs `<exe> --version` and returns the first line of its output.
pub fn tesseract_version(executable: &Path) -> Result<String> {
    let output = Command::new(executable)
        .arg("--version")
        .output()
        .with_context(|| format!("Failed to run {}", executable.display()))?;

    if !output.status.success() {
        return Err(anyhow!(
            "{} --version exited with {}",
            executable.display(),
            output.status
        ));
    }

    // Older builds print the version banner on stderr
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).to_string()
    };
    Ok(text.lines().next().unwrap_or_default().trim().to_string())
}

/// Finds the Tesseract executable.
///
/// An explicitly configured path wins and must work. Otherwise checks the
/// private install dir, then PATH, then common install locations.
pub fn find_tesseract_executable(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        tesseract_version(path)
            .with_context(|| format!("Configured Tesseract at {} is not usable", path.display()))?;
        return Ok(path.to_path_buf());
    }

    let local_exe = get_tesseract_dir().join(EXECUTABLE_NAME);
    if local_exe.exists() {
        return Ok(local_exe);
    }

    let on_path = PathBuf::from("tesseract");
    if tesseract_version(&on_path).is_ok() {
        return Ok(on_path);
    }

    for path in COMMON_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            debug!("Found Tesseract at {}", p.display());
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Install Tesseract-OCR or pass --tesseract-cmd"
    ))
}

/// Finds a tessdata directory containing eng.traineddata, if one is not
/// already known to the Tesseract build.
pub fn find_tessdata_dir() -> Option<PathBuf> {
    let local_tessdata = get_tesseract_dir().join("tessdata");
    if local_tessdata.join("eng.traineddata").exists() {
        info!("Using tessdata at {}", local_tessdata.display());
        return Some(local_tessdata);
    }

    // TESSDATA_PREFIX may point at the data dir or its parent
    let prefix = PathBuf::from(std::env::var_os("TESSDATA_PREFIX")?);
    [prefix.clone(), prefix.join("tessdata")]
        .into_iter()
        .find(|p| p.join("eng.traineddata").exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_executable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-tesseract");
        let err = find_tesseract_executable(Some(&missing)).unwrap_err();
        assert!(format!("{:#}", err).contains("not usable"));
    }

    #[test]
    fn test_tesseract_dir_is_app_scoped() {
        let dir = get_tesseract_dir();
        assert!(dir.ends_with(Path::new("dko-tracker").join("tesseract")));
    }
}
