//! File payloads: the raw byte content of a file under comparison.
//!
//! A [`Payload`] is read fully into memory before any comparison logic runs,
//! so file handles are released on every path. Gzip-compressed payloads are
//! recognized by their magic bytes and can be transparently decompressed.

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::diagnostics::VerifyError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Immutable byte content of a file under comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Reads a payload fully from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| VerifyError::io(path, e))?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the payload starts with the gzip magic bytes.
    pub fn is_gzip(&self) -> bool {
        self.bytes.starts_with(&GZIP_MAGIC)
    }

    /// Returns the gunzipped payload if this one is gzip-compressed,
    /// otherwise returns the payload unchanged.
    pub fn decompressed(&self) -> Result<Payload, VerifyError> {
        if !self.is_gzip() {
            return Ok(self.clone());
        }
        let mut decoder = GzDecoder::new(&self.bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| VerifyError::io("<gzip payload>", e))?;
        Ok(Payload { bytes: out })
    }

    /// Splits the payload into lines: segments separated by `\n`, with a
    /// trailing `\r` trimmed from each segment and a trailing empty segment
    /// (from a final newline) dropped. Comparison is therefore insensitive
    /// to CRLF vs LF endings and to a trailing newline.
    pub fn lines(&self) -> Vec<&[u8]> {
        let mut lines: Vec<&[u8]> = self
            .bytes
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .collect();
        if lines.last() == Some(&&b""[..]) {
            lines.pop();
        }
        lines
    }

    /// Lossy UTF-8 view, for diagnostics only.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}
