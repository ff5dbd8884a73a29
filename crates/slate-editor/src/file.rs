//! Document load and atomic save.
//!
//! Loading splits a file into lines and strips every trailing `\r`/`\n`
//! byte from each, so CRLF files come in clean. Saving writes each line
//! followed by `\n` to a sibling `<name>.tmp`, syncs it to disk, and renames
//! it over the target. On any failure the temporary file is removed and the
//! original is left untouched.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Read `path` into lines.
///
/// Returns `Ok(None)` if the file does not exist, which the caller treats
/// as a fresh document under that name.
///
/// # Errors
///
/// Any other read failure.
pub fn load(path: &Path) -> Result<Option<Vec<Vec<u8>>>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "file does not exist; starting empty");
            return Ok(None);
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    let lines: Vec<Vec<u8>> = data
        .split_inclusive(|&b| b == b'\n')
        .map(|line| strip_terminators(line).to_vec())
        .collect();

    tracing::debug!(path = %path.display(), lines = lines.len(), "loaded");
    Ok(Some(lines))
}

/// Drop every trailing `\r` and `\n` byte.
fn strip_terminators(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n'] = line {
        line = rest;
    }
    line
}

/// The temporary sibling used while saving `path`.
#[must_use]
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `lines` to `path` atomically.
///
/// # Errors
///
/// Creating, writing, syncing, or renaming the temporary file failed. The
/// error carries `path` and the OS reason.
pub fn save_atomic<'a>(path: &Path, lines: impl IntoIterator<Item = &'a [u8]>) -> Result<()> {
    let tmp = temp_path(path);

    let written = write_synced(&tmp, lines).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        tracing::warn!(path = %path.display(), error = %e, "save failed");
        return Err(Error::io(path, e));
    }

    tracing::info!(path = %path.display(), "saved");
    Ok(())
}

/// Create `tmp`, write every line plus `\n`, and fsync before closing.
fn write_synced<'a>(tmp: &Path, lines: impl IntoIterator<Item = &'a [u8]>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(tmp)?);
    for line in lines {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    let file = out.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lines(v: &[&str]) -> Vec<Vec<u8>> {
        v.iter().map(|l| l.as_bytes().to_vec()).collect()
    }

    // -- load ---------------------------------------------------------------

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load(&dir.path().join("nope.txt")).unwrap(), None);
    }

    #[test]
    fn load_strips_lf_and_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        fs::write(&path, b"unix\ndos\r\nlast").unwrap();
        assert_eq!(load(&path).unwrap(), Some(lines(&["unix", "dos", "last"])));
    }

    #[test]
    fn load_keeps_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, b"a\n\nb\n").unwrap();
        assert_eq!(load(&path).unwrap(), Some(lines(&["a", "", "b"])));
    }

    #[test]
    fn load_empty_file_has_no_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, b"").unwrap();
        assert_eq!(load(&path).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn load_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn strip_terminators_removes_all_trailing() {
        assert_eq!(strip_terminators(b"x\r\r\n"), b"x");
        assert_eq!(strip_terminators(b"\n"), b"");
        assert_eq!(strip_terminators(b"a\rb"), b"a\rb");
    }

    // -- save ---------------------------------------------------------------

    #[test]
    fn temp_path_appends_suffix() {
        assert_eq!(temp_path(Path::new("/a/notes.txt")), PathBuf::from("/a/notes.txt.tmp"));
    }

    #[test]
    fn save_writes_each_line_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let content = lines(&["hello", "", "world"]);
        save_atomic(&path, content.iter().map(Vec::as_slice)).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello\n\nworld\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, b"old contents that are longer\n").unwrap();
        save_atomic(&path, [b"new".as_slice()]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new\n");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.txt");
        let content = lines(&["alpha", "beta", ""]);
        save_atomic(&path, content.iter().map(Vec::as_slice)).unwrap();
        assert_eq!(load(&path).unwrap(), Some(content));
    }

    #[test]
    fn save_failure_leaves_original_and_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        // Renaming a file over a non-empty directory fails.
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        let err = save_atomic(&target, [b"data".as_slice()]).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(target.join("keep").exists());
        assert!(!temp_path(&target).exists());
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/file.txt");
        let err = save_atomic(&path, [b"x".as_slice()]).unwrap_err();
        assert!(!err.reason().is_empty());
    }
}
