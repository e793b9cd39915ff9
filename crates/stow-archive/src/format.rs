use std::io::{self, Read, Seek};

use crate::Error;

/// Compression wrapped around a tar stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TarCompress {
    #[default]
    None,
    Gzip,
    Zstd,
}

impl TarCompress {
    /// Create a decoder for this compression codec.
    pub fn decoder<R: Read>(self, reader: R) -> Result<Decoder<R>, Error> {
        match self {
            Self::None => Ok(Decoder::Passthrough(reader)),
            #[cfg(feature = "gzip")]
            Self::Gzip => Ok(Decoder::Gzip(Box::new(flate2::read::GzDecoder::new(
                reader,
            )))),
            #[cfg(not(feature = "gzip"))]
            Self::Gzip => Err(Error::UnsupportedCompression(self)),
            #[cfg(feature = "zstd")]
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::new(reader).map_err(Error::stream)?;
                Ok(Decoder::Zstd(Box::new(decoder)))
            }
            #[cfg(not(feature = "zstd"))]
            Self::Zstd => Err(Error::UnsupportedCompression(self)),
        }
    }

    /// Guess the codec from the leading bytes of a stream.
    ///
    /// Anything unrecognised is assumed to be a plain tar; the tar reader
    /// reports malformed input on its own.
    pub fn detect(data: &[u8]) -> Self {
        match data {
            [0x1F, 0x8B, ..] => Self::Gzip,
            [0x28, 0xB5, 0x2F, 0xFD, ..] => Self::Zstd,
            _ => Self::None,
        }
    }
}

/// Decoder wrapper for tar decompression.
pub enum Decoder<R: Read> {
    Passthrough(R),
    #[cfg(feature = "gzip")]
    Gzip(Box<flate2::read::GzDecoder<R>>),
    #[cfg(feature = "zstd")]
    Zstd(Box<zstd::stream::read::Decoder<'static, io::BufReader<R>>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            #[cfg(feature = "gzip")]
            Self::Gzip(d) => d.read(buf),
            #[cfg(feature = "zstd")]
            Self::Zstd(d) => d.read(buf),
        }
    }
}

/// Peek at the magic bytes of a seekable reader, then rewind it.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<TarCompress> {
    let mut magic = [0u8; 4];
    let mut filled = 0;
    while filled < magic.len() {
        let n = reader.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    reader.rewind()?;
    Ok(TarCompress::detect(&magic[..filled]))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn detect_gzip() {
        assert_eq!(TarCompress::detect(&[0x1F, 0x8B, 0x08, 0x00]), TarCompress::Gzip);
    }

    #[test]
    fn detect_zstd() {
        assert_eq!(TarCompress::detect(&[0x28, 0xB5, 0x2F, 0xFD]), TarCompress::Zstd);
    }

    #[test]
    fn detect_falls_back_to_plain() {
        assert_eq!(TarCompress::detect(b"a/b.txt"), TarCompress::None);
        assert_eq!(TarCompress::detect(&[]), TarCompress::None);
        assert_eq!(TarCompress::detect(&[0x1F]), TarCompress::None);
    }

    #[test]
    fn detect_from_reader_rewinds() {
        let mut cursor = Cursor::new(vec![0x1F, 0x8B, 0x08, 0x00, 0xAA]);
        assert_eq!(detect_from_reader(&mut cursor).unwrap(), TarCompress::Gzip);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn detect_from_short_reader() {
        let mut cursor = Cursor::new(vec![0x28]);
        assert_eq!(detect_from_reader(&mut cursor).unwrap(), TarCompress::None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn passthrough_decoder_reads_verbatim() {
        let mut decoder = TarCompress::None.decoder(Cursor::new(b"raw".to_vec())).unwrap();
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"raw");
    }

    #[cfg(not(feature = "zstd"))]
    #[test]
    fn zstd_disabled_is_reported() {
        let result = TarCompress::Zstd.decoder(Cursor::new(Vec::new()));
        assert!(matches!(
            result,
            Err(Error::UnsupportedCompression(TarCompress::Zstd))
        ));
    }
}
