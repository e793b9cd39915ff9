//! Filesystem primitives used by `stow-archive`.
//!
//! Every disk mutation of an extraction goes through [`Filesystem`];
//! [`OsFilesystem`] is the `std::fs` implementation.

mod error;
mod filesystem;
pub mod permissions;

pub use error::{Error, Result};
pub use filesystem::{Filesystem, OsFilesystem};
pub use permissions::PermissionMode;
