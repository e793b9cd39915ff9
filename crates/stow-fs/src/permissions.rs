use std::fs::File;
use std::path::Path;

use crate::{Error, Result};

/// Permission bits applied to extracted files and directories.
///
/// On non-Unix platforms mode bits have no counterpart; only the
/// read-only attribute is derived from them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionMode {
    /// Leave whatever the platform assigned on creation (umask on Unix).
    #[default]
    Inherit,

    /// `0o444`
    ReadOnly,

    /// `0o644`
    ReadWrite,

    /// `0o755`
    Executable,

    /// Exact Unix mode bits, e.g. `0o750`.
    Custom(u32),
}

impl PermissionMode {
    pub fn custom(unix_mode: u32) -> Self {
        Self::Custom(unix_mode & 0o7777)
    }

    /// Unix mode bits, or `None` for [`PermissionMode::Inherit`].
    pub fn to_unix_mode(self) -> Option<u32> {
        match self {
            Self::Inherit => None,
            Self::ReadOnly => Some(0o444),
            Self::ReadWrite => Some(0o644),
            Self::Executable => Some(0o755),
            Self::Custom(mode) => Some(mode),
        }
    }

    pub fn is_executable(self) -> bool {
        self.to_unix_mode().is_some_and(|m| m & 0o111 != 0)
    }

    pub fn is_writable(self) -> bool {
        self.to_unix_mode().is_some_and(|m| m & 0o222 != 0)
    }

    /// Apply to an already-open file handle.
    ///
    /// Going through the handle avoids a second path lookup between
    /// creation and chmod.
    pub fn apply_to_file(self, file: &File, path: &Path) -> Result<()> {
        let to_error = |e| Error::Permissions {
            path: path.to_path_buf(),
            source: e,
        };

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = self.to_unix_mode() {
                file.set_permissions(std::fs::Permissions::from_mode(mode))
                    .map_err(to_error)?;
            }
        }

        #[cfg(not(unix))]
        {
            if self != Self::Inherit {
                let mut perms = file.metadata().map_err(to_error)?.permissions();
                perms.set_readonly(!self.is_writable());
                file.set_permissions(perms).map_err(to_error)?;
            }
        }

        Ok(())
    }

    pub fn apply_to_path(self, path: &Path) -> Result<()> {
        let to_error = |e| Error::Permissions {
            path: path.to_path_buf(),
            source: e,
        };

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = self.to_unix_mode() {
                std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                    .map_err(to_error)?;
            }
        }

        #[cfg(not(unix))]
        {
            if self != Self::Inherit {
                let mut perms = std::fs::metadata(path).map_err(to_error)?.permissions();
                perms.set_readonly(!self.is_writable());
                std::fs::set_permissions(path, perms).map_err(to_error)?;
            }
        }

        Ok(())
    }
}
