use std::io::Read;

use tar::EntryType;

use crate::Result;
use crate::entry::{EntryKind, EntryMeta, PendingEntry};
use crate::error::Error;
use crate::format::{Decoder, TarCompress};
use crate::source::EntrySource;

/// A tar stream, optionally compressed.
pub struct TarArchive<R: Read> {
    archive: tar::Archive<Decoder<R>>,
}

impl<R: Read> TarArchive<R> {
    pub fn new(reader: R, codec: TarCompress) -> Result<Self> {
        let reader = codec.decoder(reader)?;
        Ok(Self {
            archive: tar::Archive::new(reader),
        })
    }

    /// Start reading entries. Can only be called once per archive.
    pub fn entries(&mut self) -> Result<TarSource<'_, Decoder<R>>> {
        Ok(TarSource {
            entries: self.archive.entries().map_err(Error::stream)?,
            current: None,
        })
    }
}

pub struct TarSource<'a, R: 'a + Read> {
    entries: tar::Entries<'a, R>,
    current: Option<tar::Entry<'a, R>>,
}

impl<'a, R: Read + 'a> EntrySource for TarSource<'a, R> {
    fn next_entry(&mut self) -> Result<Option<PendingEntry<'_>>> {
        // The tar reader seeks past any unread payload of the dropped entry.
        self.current = None;

        let entry = match self.entries.next() {
            None => return Ok(None),
            Some(entry) => entry.map_err(Error::stream)?,
        };
        let meta = entry_meta(&entry)?;

        let entry = self.current.insert(entry);
        Ok(Some(PendingEntry {
            meta,
            payload: entry,
        }))
    }
}

fn entry_meta<R: Read>(entry: &tar::Entry<'_, R>) -> Result<EntryMeta> {
    let name = entry.path().map_err(Error::stream)?.into_owned();
    let header = entry.header();
    let mode = header.mode().map_err(Error::stream)?;

    let kind = match header.entry_type() {
        EntryType::Directory => EntryKind::Directory,
        // Pre-POSIX archives mark directories with a trailing slash only.
        EntryType::Regular if entry.path_bytes().ends_with(b"/") => EntryKind::Directory,
        EntryType::Regular | EntryType::Continuous => EntryKind::RegularFile,
        _ => EntryKind::Other,
    };

    Ok(EntryMeta::new(name, kind, mode).with_size(entry.size()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn append(builder: &mut tar::Builder<Vec<u8>>, path: &str, kind: EntryType, data: &[u8]) {
        let mut header = tar::Header::new_gnu();
        header.set_path(path).unwrap();
        header.set_entry_type(kind);
        header.set_mode(0o640);
        header.set_size(data.len() as u64);
        header.set_cksum();
        builder.append(&header, data).unwrap();
    }

    fn archive(build: impl FnOnce(&mut tar::Builder<Vec<u8>>)) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        build(&mut builder);
        builder.into_inner().unwrap()
    }

    #[test]
    fn yields_metadata_in_archive_order() {
        let data = archive(|b| {
            append(b, "a/", EntryType::Directory, b"");
            append(b, "a/b.txt", EntryType::Regular, b"hello");
            append(b, "a/fifo", EntryType::Fifo, b"");
        });

        let mut archive = TarArchive::new(Cursor::new(data), TarCompress::None).unwrap();
        let mut source = archive.entries().unwrap();

        let first = source.next_entry().unwrap().unwrap();
        assert_eq!(first.meta.kind, EntryKind::Directory);
        assert_eq!(first.meta.mode, 0o640);

        let second = source.next_entry().unwrap().unwrap();
        assert_eq!(second.meta.name, std::path::PathBuf::from("a/b.txt"));
        assert_eq!(second.meta.kind, EntryKind::RegularFile);
        assert_eq!(second.meta.size, 5);
        let mut body = String::new();
        second.payload.read_to_string(&mut body).unwrap();
        assert_eq!(body, "hello");

        let third = source.next_entry().unwrap().unwrap();
        assert_eq!(third.meta.kind, EntryKind::Other);

        assert!(source.next_entry().unwrap().is_none());
    }

    #[test]
    fn unread_payload_is_skipped() {
        let data = archive(|b| {
            append(b, "big.bin", EntryType::Regular, &[7u8; 4096]);
            append(b, "small.txt", EntryType::Regular, b"tail");
        });

        let mut archive = TarArchive::new(Cursor::new(data), TarCompress::None).unwrap();
        let mut source = archive.entries().unwrap();

        let big = source.next_entry().unwrap().unwrap();
        let mut partial = [0u8; 10];
        big.payload.read_exact(&mut partial).unwrap();

        let small = source.next_entry().unwrap().unwrap();
        let mut body = Vec::new();
        small.payload.read_to_end(&mut body).unwrap();
        assert_eq!(body, b"tail");
    }

    #[test]
    fn old_style_directory_marker() {
        let data = archive(|b| append(b, "legacy/", EntryType::Regular, b""));

        let mut archive = TarArchive::new(Cursor::new(data), TarCompress::None).unwrap();
        let mut source = archive.entries().unwrap();
        let entry = source.next_entry().unwrap().unwrap();
        assert_eq!(entry.meta.kind, EntryKind::Directory);
    }

    #[test]
    fn truncated_stream_is_a_stream_error() {
        let mut data = archive(|b| append(b, "f.txt", EntryType::Regular, &[1u8; 2048]));
        data.truncate(300);

        let mut archive = TarArchive::new(Cursor::new(data), TarCompress::None).unwrap();
        let mut source = archive.entries().unwrap();
        let mut failed = false;
        for _ in 0..3 {
            match source.next_entry() {
                Ok(Some(entry)) => {
                    if std::io::copy(entry.payload, &mut std::io::sink()).is_err() {
                        failed = true;
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    assert!(matches!(err, Error::Stream { .. }));
                    failed = true;
                    break;
                }
            }
        }
        assert!(failed);
    }
}
