//! Streaming tar extraction with pluggable destination routing.
//!
//! # Architecture
//!
//! - `source/` - Entry decoding ([`EntrySource`], tar backend)
//! - `router.rs` - Destination policies ([`Router`], [`FolderRouter`])
//! - `sanitize.rs` - Traversal check on recorded entry names
//! - `extract.rs` - The per-entry loop and the public entry points
//! - `format.rs` - Compression codecs around the tar stream
//!
//! Disk writes go through [`stow_fs::Filesystem`].

pub use entry::{EntryKind, EntryMeta, EntryOutcome, ExtractReport, PendingEntry};
pub use error::{Error, Result};
pub use extract::{Extraction, State, extract_entries, untar, untar_file, untar_with_options};
pub use format::TarCompress;
pub use options::{ExtractOptions, OtherEntryPolicy, PermissionStrategy};
pub use router::{FilterRouter, FolderRouter, Route, Router, RouterExt, StripComponents};
pub use sanitize::check_entry_name;
pub use source::{EntrySource, TarArchive, TarSource};

pub mod entry;
pub mod extract;
pub mod format;
pub mod options;
pub mod router;
pub mod source;
mod error;
mod sanitize;
