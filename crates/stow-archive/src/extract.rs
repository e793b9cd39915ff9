//! Entry-by-entry extraction.
//!
//! Entries are pulled one at a time, routed, checked against the traversal
//! rule and written through a [`Filesystem`]. The first error ends the
//! extraction; entries already written stay on disk.
//!
//! # Platform Behavior
//!
//! **Unix**: mode bits from the archive (resolved by the
//! [`PermissionStrategy`](crate::options::PermissionStrategy)) are applied.
//!
//! **Windows**: only the read-only attribute is derived from the mode.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use stow_fs::{Filesystem, OsFilesystem, PermissionMode};

use crate::entry::{EntryKind, EntryOutcome, ExtractReport, PendingEntry};
use crate::error::{Error, Result};
use crate::format;
use crate::options::{ExtractOptions, OtherEntryPolicy};
use crate::router::{FolderRouter, Route, Router};
use crate::sanitize::check_entry_name;
use crate::source::{EntrySource, TarArchive};

/// Lifecycle of an [`Extraction`]. `Done` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Reading,
    Done,
    Failed,
}

/// A single extraction call, driven one entry at a time.
pub struct Extraction<S, R, F = OsFilesystem> {
    source: S,
    router: R,
    fs: F,
    options: ExtractOptions,
    state: State,
    report: ExtractReport,
}

impl<S, R, F> Extraction<S, R, F>
where
    S: EntrySource,
    R: Router,
    F: Filesystem,
{
    pub fn new(source: S, router: R, fs: F, options: ExtractOptions) -> Self {
        Self {
            source,
            router,
            fs,
            options,
            state: State::Reading,
            report: ExtractReport::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Totals of the entries processed so far.
    pub fn report(&self) -> &ExtractReport {
        &self.report
    }

    /// Process the next entry.
    ///
    /// Returns `Ok(None)` once the source is exhausted. After an error every
    /// further call returns [`Error::Halted`].
    pub fn step(&mut self) -> Result<Option<EntryOutcome>> {
        match self.state {
            State::Done => return Ok(None),
            State::Failed => return Err(Error::Halted),
            State::Reading => {}
        }

        match self.advance() {
            Ok(Some(outcome)) => {
                self.report.record(&outcome);
                Ok(Some(outcome))
            }
            Ok(None) => {
                self.state = State::Done;
                tracing::debug!(
                    directories = self.report.directories,
                    files = self.report.files,
                    skipped = self.report.skipped,
                    ignored = self.report.ignored,
                    bytes = self.report.total_bytes,
                    "extraction complete"
                );
                Ok(None)
            }
            Err(err) => {
                self.state = State::Failed;
                Err(err)
            }
        }
    }

    /// Drive the extraction to the end of the stream.
    pub fn run(mut self) -> Result<ExtractReport> {
        while self.step()?.is_some() {}
        Ok(self.report)
    }

    fn advance(&mut self) -> Result<Option<EntryOutcome>> {
        let Some(PendingEntry { meta, payload }) = self.source.next_entry()? else {
            return Ok(None);
        };

        let path = match self.router.route(&meta) {
            Route::Skip => {
                tracing::trace!(entry = %meta.name.display(), "skipped by router");
                return Ok(Some(EntryOutcome::Skipped(meta.name)));
            }
            Route::Extract(path) => path,
        };

        check_entry_name(&meta.name)?;

        let mode = self.options.perm_strategy.resolve(meta.kind, meta.mode);
        match meta.kind {
            EntryKind::Directory => {
                tracing::debug!(entry = %meta.name.display(), path = %path.display(), "creating directory");
                self.fs.create_dir_all(&path, mode)?;
                Ok(Some(EntryOutcome::Directory(path)))
            }
            EntryKind::RegularFile => {
                tracing::debug!(
                    entry = %meta.name.display(),
                    path = %path.display(),
                    executable = meta.is_executable(),
                    "writing file"
                );
                if self.options.create_parents {
                    let parent_mode = self
                        .options
                        .perm_strategy
                        .resolve(EntryKind::Directory, PARENT_DIR_MODE);
                    ensure_parent(&self.fs, &path, parent_mode)?;
                }
                let bytes = write_file(&self.fs, &path, mode, payload)?;
                Ok(Some(EntryOutcome::File { path, bytes }))
            }
            EntryKind::Other => match self.options.other_entries {
                OtherEntryPolicy::Ignore => {
                    tracing::debug!(entry = %meta.name.display(), "ignoring unsupported entry kind");
                    Ok(Some(EntryOutcome::Ignored(meta.name)))
                }
                OtherEntryPolicy::Reject => Err(Error::UnsupportedEntry { entry: meta.name }),
            },
        }
    }
}

/// Recorded mode assumed for parent directories the archive never lists.
const PARENT_DIR_MODE: u32 = 0o755;

fn ensure_parent<F: Filesystem>(fs: &F, path: &Path, mode: PermissionMode) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs.create_dir_all(parent, mode)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Copy one payload into a fresh destination file.
///
/// The handle lives only in this frame, so it is closed on every return
/// path before the caller can pull the next entry.
fn write_file<F: Filesystem>(
    fs: &F,
    path: &Path,
    mode: PermissionMode,
    payload: &mut dyn Read,
) -> Result<u64> {
    let copy_error = |source| Error::Copy {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs.create_file(path, mode)?;
    let bytes = io::copy(payload, &mut file).map_err(copy_error)?;
    file.flush().map_err(copy_error)?;
    Ok(bytes)
}

/// Extract every entry of `source`, generic over all collaborators.
pub fn extract_entries<S, R, F>(
    source: S,
    router: R,
    fs: F,
    options: &ExtractOptions,
) -> Result<ExtractReport>
where
    S: EntrySource,
    R: Router,
    F: Filesystem,
{
    Extraction::new(source, router, fs, options.clone()).run()
}

/// Extract a tar stream with a caller-supplied router.
pub fn untar<T: Read, R: Router>(reader: T, router: R) -> Result<ExtractReport> {
    untar_with_options(reader, router, &ExtractOptions::default())
}

/// Extract a tar stream, decoding it with `options.compression`.
pub fn untar_with_options<T: Read, R: Router>(
    reader: T,
    router: R,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let mut archive = TarArchive::new(reader, options.compression)?;
    extract_entries(archive.entries()?, router, OsFilesystem, options)
}

/// Extract the tar archive at `archive` under `destination`.
///
/// Compression is detected from the leading bytes of the file. The archive
/// file is closed before this returns.
pub fn untar_file(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<ExtractReport> {
    let archive = archive.as_ref();
    let destination = destination.as_ref();

    let mut file = File::open(archive).map_err(|e| Error::OpenArchive {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let compression = format::detect_from_reader(&mut file).map_err(Error::stream)?;
    tracing::debug!(
        archive = %archive.display(),
        destination = %destination.display(),
        ?compression,
        "extracting archive file"
    );

    let options = ExtractOptions::default().compression(compression);
    untar_with_options(
        BufReader::new(file),
        FolderRouter::new(destination),
        &options,
    )
}
