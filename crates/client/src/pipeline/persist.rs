//! Report persistence.
//!
//! Reports are written to a temporary file in the destination directory,
//! flushed and synced, then renamed over the destination. A failure at any
//! step drops the temporary file, so no partial report is left behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use wxmp_core::Error;

/// A report that reached disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Absolute path of the report.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

/// Temp files are created owner-only; reports get the mode of the file they
/// replace, or `0644` when new.
#[cfg(unix)]
fn apply_report_permissions(file: &fs::File, path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = fs::metadata(path)
        .map(|meta| meta.permissions())
        .unwrap_or_else(|_| fs::Permissions::from_mode(0o644));
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
fn apply_report_permissions(_file: &fs::File, _path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::WriteFailed(format!("failed to write {}: {}", path.display(), err))
}

/// Write `contents` to `path`, creating parent directories as needed.
pub async fn write_report(path: PathBuf, contents: String) -> Result<WrittenFile, Error> {
    tokio::task::spawn_blocking(move || write_report_blocking(&path, &contents))
        .await
        .map_err(|e| Error::WriteFailed(format!("write task failed: {e}")))?
}

/// Blocking body of [`write_report`].
pub fn write_report_blocking(path: &Path, contents: &str) -> Result<WrittenFile, Error> {
    if path.as_os_str().is_empty() {
        return Err(Error::WriteFailed("output path is empty".into()));
    }
    if path.is_dir() {
        return Err(write_error(path, "path is a directory"));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| write_error(path, e))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| write_error(path, e))?;
    tmp.write_all(contents.as_bytes()).map_err(|e| write_error(path, e))?;
    tmp.flush().map_err(|e| write_error(path, e))?;
    apply_report_permissions(tmp.as_file(), path).map_err(|e| write_error(path, e))?;
    tmp.as_file().sync_all().map_err(|e| write_error(path, e))?;

    let file = tmp.persist(path).map_err(|e| write_error(path, e.error))?;
    let size = file.metadata().map_err(|e| write_error(path, e))?.len();
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    tracing::info!("report saved to {} ({} bytes)", path.display(), size);

    Ok(WrittenFile { path, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/report.md");

        let written = write_report(target.clone(), "# 报告\n".into()).await.unwrap();

        assert!(written.path.is_absolute());
        assert_eq!(written.size, "# 报告\n".len() as u64);
        assert_eq!(fs::read_to_string(&target).unwrap(), "# 报告\n");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.md");
        fs::write(&target, "old contents that are longer").unwrap();

        let written = write_report(target.clone(), "new".into()).await.unwrap();

        assert_eq!(written.size, 3);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_report_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.md");

        write_report(target.clone(), "内容".into()).await.unwrap();

        assert_eq!(fs::metadata(&target).unwrap().permissions().mode() & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.md");
        fs::write(&target, "old").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

        write_report(target.clone(), "new".into()).await.unwrap();

        assert_eq!(fs::metadata(&target).unwrap().permissions().mode() & 0o777, 0o640);
    }

    #[test]
    fn test_write_under_file_fails_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = write_report_blocking(&blocker.join("report.md"), "contents");

        assert!(matches!(result, Err(Error::WriteFailed(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_to_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_report_blocking(dir.path(), "contents");
        assert!(matches!(result, Err(Error::WriteFailed(_))));
    }

    #[test]
    fn test_write_empty_path_fails() {
        let result = write_report_blocking(Path::new(""), "contents");
        assert!(matches!(result, Err(Error::WriteFailed(_))));
    }
}
