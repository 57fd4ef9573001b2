//! File persistence helpers for generated artifacts.
//!
//! All artifacts are replaced atomically: content goes to a temp file in the
//! destination directory which is then renamed over the target, so a reader
//! (dhcpd, the file server) never sees a half-written file.

use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::{Result, ZtpError};

/// Atomically replace `path` with `content`. The parent directory must exist.
pub fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| ZtpError::io(parent, e))?;

    // Generated configs must stay readable by dhcpd and the file server.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| ZtpError::io(tmp.path(), e))?;
    }

    tmp.write_all(content).map_err(|e| ZtpError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| ZtpError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| ZtpError::io(path, e.error))?;

    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// Remove a file, logging instead of failing. Returns true if it was removed.
pub fn remove_file_logged(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {:?}", path);
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Nothing to remove at {:?}", path);
            false
        }
        Err(e) => {
            warn!("Failed to remove {:?}: {}", path, e);
            false
        }
    }
}
