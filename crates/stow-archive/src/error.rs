use std::io;
use std::path::PathBuf;

use crate::format::TarCompress;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read archive stream: {source}")]
    Stream { source: io::Error },

    #[error("failed to open archive '{path}': {source}")]
    OpenArchive { path: PathBuf, source: io::Error },

    #[error("{0:?} compression is not enabled in this build")]
    UnsupportedCompression(TarCompress),

    #[error("entry '{entry}' contains a directory traversal component")]
    Traversal { entry: PathBuf },

    #[error(transparent)]
    Filesystem(#[from] stow_fs::Error),

    #[error("failed to copy entry payload to '{path}': {source}")]
    Copy { path: PathBuf, source: io::Error },

    #[error("entry '{entry}' is neither a directory nor a regular file")]
    UnsupportedEntry { entry: PathBuf },

    #[error("extraction already failed")]
    Halted,
}

impl Error {
    pub(crate) fn stream(source: io::Error) -> Self {
        Self::Stream { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
