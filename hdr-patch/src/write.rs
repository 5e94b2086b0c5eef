//! Atomic replacement of the output header.
//!
//! The new content goes to a temporary file next to the destination, is
//! synced, and is then renamed over the destination. The destination is
//! therefore either the old file or the complete new one. A temporary file
//! left over from a failed write is removed when it is dropped.

use std::fs::{File, Permissions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Replace `path` with `contents` atomically.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    write_atomic_with(path, |file| file.write_all(contents))
}

fn write_atomic_with<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    // The rename is only atomic within one filesystem, so stay in the
    // destination's directory.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = match path.file_name() {
        Some(name) => format!(".{}.", name.to_string_lossy()),
        None => anyhow::bail!("output path {} has no file name", path.display()),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    debug!(tmp = %tmp.path().display(), "writing temporary file");

    fill(tmp.as_file_mut())
        .with_context(|| format!("writing temporary file {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("syncing temporary file {}", tmp.path().display()))?;
    if let Some(perms) = target_permissions(path) {
        tmp.as_file()
            .set_permissions(perms)
            .with_context(|| format!("setting permissions on {}", tmp.path().display()))?;
    }

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Permissions for the replacement file: those of the file being replaced,
/// or a regular `rw-r--r--` header when there is none yet. Temporary files
/// are created owner-only, which would otherwise leak into the output.
fn target_permissions(path: &Path) -> Option<Permissions> {
    match std::fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
