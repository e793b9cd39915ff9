//! Forward-only entry streams.

use crate::Result;
use crate::entry::PendingEntry;

mod tarball;

pub use tarball::{TarArchive, TarSource};

/// Archive-specific entry source.
///
/// Entries come out in archive order. Requesting the next entry discards
/// whatever the caller left unread of the previous payload, so sources
/// backed by non-seekable streams must skip those bytes themselves.
pub trait EntrySource {
    /// Advance to the next entry. `Ok(None)` marks the end of the stream.
    fn next_entry(&mut self) -> Result<Option<PendingEntry<'_>>>;
}

impl<S: EntrySource + ?Sized> EntrySource for &mut S {
    fn next_entry(&mut self) -> Result<Option<PendingEntry<'_>>> {
        (**self).next_entry()
    }
}

impl<S: EntrySource + ?Sized> EntrySource for Box<S> {
    fn next_entry(&mut self) -> Result<Option<PendingEntry<'_>>> {
        (**self).next_entry()
    }
}
