use std::io::Read;
use std::path::PathBuf;

/// Kind of an archive entry, as far as extraction is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    RegularFile,
    /// Symlinks, hard links, devices, fifos.
    Other,
}

/// Header data of an archive entry. Never includes the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryMeta {
    /// Path as recorded in the archive. Untrusted.
    pub name: PathBuf,
    pub kind: EntryKind,
    /// Permission bits, already masked to `0o7777`.
    pub mode: u32,
    /// Payload length recorded in the header.
    pub size: u64,
}

impl EntryMeta {
    pub fn new(name: impl Into<PathBuf>, kind: EntryKind, mode: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            mode: mode & 0o7777,
            size: 0,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::RegularFile
    }

    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// The current entry of an [`EntrySource`](crate::EntrySource).
///
/// `payload` borrows the source, so it cannot outlive the next call to
/// `next_entry`.
pub struct PendingEntry<'a> {
    pub meta: EntryMeta,
    pub payload: &'a mut dyn Read,
}

/// Outcome of processing a single entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    Directory(PathBuf),
    File { path: PathBuf, bytes: u64 },
    /// The router declined the entry. Carries the recorded name.
    Skipped(PathBuf),
    /// Entry of [`EntryKind::Other`] passed over. Carries the recorded name.
    Ignored(PathBuf),
}

/// Totals of a successful extraction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub directories: usize,
    pub files: usize,
    pub skipped: usize,
    pub ignored: usize,
    pub total_bytes: u64,
}

impl ExtractReport {
    pub fn entry_count(&self) -> usize {
        self.directories + self.files + self.skipped + self.ignored
    }

    pub(crate) fn record(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Directory(_) => self.directories += 1,
            EntryOutcome::File { bytes, .. } => {
                self.files += 1;
                self.total_bytes += bytes;
            }
            EntryOutcome::Skipped(_) => self.skipped += 1,
            EntryOutcome::Ignored(_) => self.ignored += 1,
        }
    }
}
