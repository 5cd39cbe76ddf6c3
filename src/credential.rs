//! Per-run deploy credential file
//!
//! The private key arrives as bytes from the build system, but ssh wants a
//! file. The file lives next to the workspace, is readable only by its
//! owner, and is removed when the run ends on every exit path.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::CourierResult;

/// Scoped credential file for one deployment run.
///
/// Dropping the value deletes the file.
pub struct CredentialFile {
    file: NamedTempFile,
}

impl CredentialFile {
    /// Write key material into a fresh owner-only file under `dir`.
    pub fn write(dir: &Path, key: &[u8]) -> CourierResult<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("courier-key-")
            .suffix(".pem")
            .tempfile_in(dir)?;
        file.write_all(key)?;
        file.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(Self { file })
    }

    /// Path handed to every ssh/scp invocation of the run.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
