//! Reading log files from disk into [`RawLog`]s.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{SltError, SltResult};
use crate::models::RawLog;

pub const LOG_EXTENSIONS: &[&str] = &["log", "txt"];

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Read one log.  Bytes that are not UTF-8 are replaced, with a warning.
pub fn read_log(path: impl AsRef<Path>) -> SltResult<RawLog> {
    let path = path.as_ref();
    let file_name = display_name(path);
    let bytes = std::fs::read(path).map_err(|e| SltError::parse(&file_name, e.to_string()))?;
    let content = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("{file_name}: invalid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok(RawLog::new(file_name, content))
}

fn is_log_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| LOG_EXTENSIONS.iter().any(|l| ext.eq_ignore_ascii_case(l)))
}

/// Every `.log` / `.txt` file under `dir`, sorted by file name.
pub fn collect_logs(dir: impl AsRef<Path>) -> SltResult<Vec<RawLog>> {
    let dir = dir.as_ref();
    let mut logs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| SltError::parse(display_name(dir), e.to_string()))?;
        if entry.file_type().is_file() && is_log_file(entry.path()) {
            logs.push(read_log(entry.path())?);
        }
    }
    debug!("collected {} logs from {}", logs.len(), dir.display());
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_lossy_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chip.log");
        fs::write(&path, b"Marking ID: X1\xff\n").unwrap();
        let log = read_log(&path).unwrap();
        assert_eq!(log.file_name, "chip.log");
        assert!(log.content.starts_with("Marking ID: X1"));
        assert!(log.content.contains('\u{FFFD}'));
    }

    #[test]
    fn missing_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_log(dir.path().join("gone.log")).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("gone.log"));
    }

    #[test]
    fn collects_sorted_log_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.log"), "b").unwrap();
        fs::write(dir.path().join("a.TXT"), "a").unwrap();
        fs::write(dir.path().join("notes.md"), "skip").unwrap();
        fs::write(dir.path().join("sub/c.log"), "c").unwrap();

        let logs = collect_logs(dir.path()).unwrap();
        let names: Vec<&str> = logs.iter().map(|l| l.file_name.as_str()).collect();
        assert_eq!(names, ["a.TXT", "b.log", "c.log"]);
    }
}
