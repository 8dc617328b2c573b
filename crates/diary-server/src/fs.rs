//! Filesystem helpers for the blob file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use diary_core::{DiaryError, Result};

/// Create `path` (and its parent directories) as an empty file if missing.
pub fn ensure_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DiaryError::Storage(format!(
                "Failed to create data directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    if !path.exists() {
        fs::write(path, b"").map_err(|e| {
            DiaryError::Storage(format!("Failed to create {}: {}", path.display(), e))
        })?;
    }
    Ok(())
}

/// Replace the contents of `path` via a synced temp file and a rename, so
/// readers never observe a partially written blob.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| DiaryError::Storage("Invalid blob path".to_string()))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| DiaryError::Storage(format!("System time error: {}", e)))?
        .as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DiaryError::Storage("Invalid blob filename".to_string()))?;
    let temp_path = parent.join(format!("{}.{}.tmp", filename, nanos));

    let written = fill_temp(&temp_path, data).and_then(|()| {
        rename_with_fallback(&temp_path, path)
            .map_err(|e| DiaryError::Storage(format!("Atomic rename failed: {}", e)))
    });
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn fill_temp(temp_path: &Path, data: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .map_err(|e| DiaryError::Storage(format!("Temp file create failed: {}", e)))?;
    file.write_all(data)
        .map_err(|e| DiaryError::Storage(format!("Temp file write failed: {}", e)))?;
    file.sync_all()
        .map_err(|e| DiaryError::Storage(format!("Temp file sync failed: {}", e)))
}

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the temp file is cleaned up.
///
/// # Errors
///
/// Returns an error if the rename fails even after the fallback attempt.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        // Best-effort replace on platforms where rename fails if target exists.
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!("initial: {}, retry: {}", initial_err, retry_err),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_file_creates_directory_and_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("journal.enc");

        ensure_file(&path).unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_ensure_file_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.enc");
        fs::write(&path, "abc").unwrap();

        ensure_file(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "abc");
    }

    #[test]
    fn test_write_atomic_overwrites_and_cleans_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.enc");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let path = dir.path().join("journal.enc");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let result = write_atomic(&path, b"new");

        assert!(matches!(result, Err(DiaryError::Storage(_))));
        assert!(path.join("keep").exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
