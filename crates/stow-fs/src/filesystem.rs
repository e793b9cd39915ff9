use std::fs::{DirBuilder, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::permissions::PermissionMode;
use crate::{Error, Result};

/// Filesystem mutations performed during extraction.
///
/// Extraction never touches the disk except through this trait, which is
/// what lets tests count open handles or inject failures.
pub trait Filesystem {
    /// Writable handle for one destination file. Dropping it closes the file.
    type File: Write;

    /// Create `path` and every missing ancestor. A newly created `path`
    /// carries `mode` exactly; existing directories are left as they are.
    fn create_dir_all(&self, path: &Path, mode: PermissionMode) -> Result<()>;

    /// Open `path` for writing, creating it if missing and truncating it
    /// otherwise. The returned handle carries `mode`.
    fn create_file(&self, path: &Path, mode: PermissionMode) -> Result<Self::File>;
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    type File = F::File;

    fn create_dir_all(&self, path: &Path, mode: PermissionMode) -> Result<()> {
        (**self).create_dir_all(path, mode)
    }

    fn create_file(&self, path: &Path, mode: PermissionMode) -> Result<Self::File> {
        (**self).create_file(path, mode)
    }
}

/// The real filesystem, through `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    type File = File;

    fn create_dir_all(&self, path: &Path, mode: PermissionMode) -> Result<()> {
        let existed = path.is_dir();
        let mut builder = DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            if let Some(mode) = mode.to_unix_mode() {
                builder.mode(mode);
            }
        }

        builder.create(path).map_err(|e| Error::CreateDir {
            path: path.to_path_buf(),
            source: e,
        })?;

        // The builder mode is filtered by the umask.
        if !existed {
            mode.apply_to_path(path)?;
        }

        tracing::trace!(path = %path.display(), ?mode, "directory ready");
        Ok(())
    }

    fn create_file(&self, path: &Path, mode: PermissionMode) -> Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            if let Some(mode) = mode.to_unix_mode() {
                options.mode(mode);
            }
        }

        let file = options.open(path).map_err(|e| Error::CreateFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Creation mode is filtered by the umask and ignored for files that
        // already existed.
        mode.apply_to_file(&file, path)?;

        tracing::trace!(path = %path.display(), ?mode, "file opened");
        Ok(file)
    }
}
