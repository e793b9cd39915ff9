use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to open '{path}' for writing: {source}")]
    CreateFile { path: PathBuf, source: io::Error },

    #[error("failed to set permissions on '{path}': {source}")]
    Permissions { path: PathBuf, source: io::Error },
}

impl Error {
    /// Path the failed operation targeted.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::CreateDir { path, .. }
            | Self::CreateFile { path, .. }
            | Self::Permissions { path, .. } => path,
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::CreateDir { source, .. }
            | Self::CreateFile { source, .. }
            | Self::Permissions { source, .. } => source.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_exposes_path_and_kind() {
        let err = Error::CreateFile {
            path: PathBuf::from("out/a.txt"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.path(), std::path::Path::new("out/a.txt"));
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(err.to_string().contains("out/a.txt"));
    }
}
