//! Owner-only key files.
//!
//! Keys are written to a temporary file next to the target and renamed into
//! place, so an existing key is only ever replaced by a complete new one.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{CryptoError, CryptoResult};

fn io_error(e: impl std::fmt::Display) -> CryptoError {
    CryptoError::IoError(e.to_string())
}

/// Write a key file through a temporary sibling (0o600 on Unix).
///
/// With `overwrite` unset the final rename fails if `path` already exists.
pub(crate) fn write_private(
    path: &Path,
    overwrite: bool,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> CryptoResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    write(tmp.as_file_mut()).map_err(io_error)?;
    tmp.as_file().sync_all().map_err(io_error)?;

    if overwrite {
        tmp.persist(path).map_err(|e| io_error(e.error))?;
    } else {
        tmp.persist_noclobber(path).map_err(|e| io_error(e.error))?;
    }
    Ok(())
}

/// Reject key files that are symlinks.
pub(crate) fn refuse_symlink(path: &Path) -> CryptoResult<()> {
    let meta = std::fs::symlink_metadata(path).map_err(io_error)?;
    if meta.file_type().is_symlink() {
        return Err(CryptoError::IoError(
            "refusing to read key file: path is a symlink".into(),
        ));
    }
    Ok(())
}
