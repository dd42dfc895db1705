//! Version-control edit guards
//!
//! Lock-based version control systems keep checked-in files read-only until
//! they are checked out. A file repository consults its [`EditGuard`] before
//! overwriting an existing settings file.

use std::fmt::Debug;
use std::fs;

use settings_fs::{Error, NormalizedPath, Result};

/// Decides whether a file may be written and makes it writable if needed.
pub trait EditGuard: Debug {
    /// Whether `path` can be written right now.
    fn is_editable(&self, path: &NormalizedPath) -> bool;

    /// Check out or unlock `path` for editing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be made editable; the caller
    /// then abandons the write.
    fn make_editable(&self, path: &NormalizedPath) -> Result<()>;
}

/// No version control: every file is editable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVersionControl;

impl EditGuard for NoVersionControl {
    fn is_editable(&self, _path: &NormalizedPath) -> bool {
        true
    }

    fn make_editable(&self, _path: &NormalizedPath) -> Result<()> {
        Ok(())
    }
}

/// Treats a read-only file as checked in and clears the flag on checkout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyCheckout;

impl EditGuard for ReadOnlyCheckout {
    fn is_editable(&self, path: &NormalizedPath) -> bool {
        fs::metadata(path.to_native())
            .map(|meta| !meta.permissions().readonly())
            .unwrap_or(true)
    }

    fn make_editable(&self, path: &NormalizedPath) -> Result<()> {
        let native = path.to_native();
        let mut perms = fs::metadata(&native)
            .map_err(|e| Error::io(&native, e))?
            .permissions();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            perms.set_mode(perms.mode() | 0o200);
        }
        #[cfg(not(unix))]
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);

        tracing::debug!(path = %path, "Checking out settings file for editing");
        fs::set_permissions(&native, perms).map_err(|e| Error::io(&native, e))
    }
}
