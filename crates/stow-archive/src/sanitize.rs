use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Reject entry names that could leave the destination subtree.
///
/// Runs against the name recorded in the archive, never against a routed
/// path: routers are trusted, archive contents are not. Absolute names
/// pass; [`FolderRouter`](crate::FolderRouter) re-roots them under its
/// destination.
pub fn check_entry_name(name: &Path) -> Result<()> {
    let escapes = name
        .components()
        .any(|component| matches!(component, Component::ParentDir));

    if escapes {
        tracing::warn!(entry = %name.display(), "rejecting entry with traversal component");
        return Err(Error::Traversal {
            entry: name.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_relative_names_pass() {
        for name in ["a", "a/", "a/b.txt", "./a/b", "pkg-1.0/bin/tool", "dots..in..name"] {
            assert!(check_entry_name(Path::new(name)).is_ok(), "{name}");
        }
    }

    #[test]
    fn parent_components_rejected() {
        for name in ["..", "../evil.txt", "a/../../b", "a/b/..", "./../x"] {
            let err = check_entry_name(Path::new(name)).unwrap_err();
            assert!(matches!(err, Error::Traversal { .. }), "{name}");
        }
    }

    #[test]
    fn absolute_names_pass() {
        assert!(check_entry_name(Path::new("/abs/x.txt")).is_ok());
    }

    #[test]
    fn absolute_names_with_parent_rejected() {
        let result = check_entry_name(Path::new("/abs/../../x.txt"));
        assert!(matches!(result, Err(Error::Traversal { .. })));
    }

    #[test]
    fn error_names_the_entry() {
        let err = check_entry_name(Path::new("../evil.txt")).unwrap_err();
        assert!(err.to_string().contains("../evil.txt"));
    }
}
