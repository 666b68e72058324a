//! TLDAT header decoding.
//!
//! The header file is a flat table: a mode-width entry count followed by
//! fixed-size records. Field widths and byte order vary by platform
//! generation and are supplied explicitly as a [`HeaderMode`]; the decode is
//! a pure function of `(bytes, mode)`.

use std::collections::HashSet;

use tldat_common::{BinaryReader, HeaderMode};

use crate::{Error, Result};

/// Size of the fixed extension-token field in a header record.
const EXTENSION_FIELD_LEN: usize = 12;

/// One packed file as described by a header record.
///
/// This is metadata only; the payload bytes live in the blob file at
/// `[offset, offset + length)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// 64-bit hash of the original file name.
    pub name_hash: u64,
    /// Uppercase extension token, e.g. `TOTEXB_D`.
    pub extension: String,
    /// Ordinal position in the header. Aligns with the per-file key table.
    pub index: u32,
    /// Absolute byte offset of the payload within the blob.
    pub offset: u64,
    /// Payload length in bytes.
    pub length: u64,
    /// Whether the payload is a TLZC container after decryption.
    pub is_compressed: bool,
}

/// A decoded TLDAT header: the ordered entry table plus the mode it was
/// decoded with.
///
/// Built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ArchiveHeader {
    entries: Vec<ArchiveEntry>,
    keys: HashSet<(u64, String)>,
    mode: HeaderMode,
}

impl ArchiveHeader {
    /// Decode a header buffer.
    ///
    /// The buffer must already be decrypted (see
    /// [`EncryptionContext::header_key`](crate::EncryptionContext::header_key)).
    /// Entry indices are assigned strictly by read order.
    pub fn parse(data: &[u8], mode: HeaderMode) -> Result<Self> {
        let mut reader = BinaryReader::new(data, mode.endian);

        let count = reader.read_uint(mode.width)?;

        // nameHash + extension + offset + length + compressed flag.
        // Guard in u64 so an implausible count errors before any narrowing.
        let record_size = (8 + EXTENSION_FIELD_LEN + 2 * mode.width.field_size() + 1) as u64;
        let fits = count
            .checked_mul(record_size)
            .is_some_and(|needed| needed <= reader.remaining() as u64);
        if !fits {
            return Err(Error::Format(format!(
                "header truncated: {count} entries of {record_size} bytes, {} available",
                reader.remaining()
            )));
        }

        let mut entries = Vec::with_capacity(count as usize);
        let mut keys = HashSet::with_capacity(count as usize);

        for index in 0..count as u32 {
            let name_hash = reader.read_u64()?;
            let extension = reader
                .read_string_in_buffer(EXTENSION_FIELD_LEN)?
                .to_ascii_uppercase();
            let offset = reader.read_uint(mode.width)?;
            let length = reader.read_uint(mode.width)?;
            let is_compressed = reader.read_bool()?;

            keys.insert((name_hash, extension.clone()));
            entries.push(ArchiveEntry {
                name_hash,
                extension,
                index,
                offset,
                length,
                is_compressed,
            });
        }

        Ok(Self {
            entries,
            keys,
            mode,
        })
    }

    /// The ordered entry table.
    #[inline]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the header describes no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The mode this header was decoded with.
    #[inline]
    pub fn mode(&self) -> HeaderMode {
        self.mode
    }

    /// Check whether an entry with the given hash and extension exists.
    pub fn entry_exists(&self, name_hash: u64, extension: &str) -> bool {
        self.keys
            .contains(&(name_hash, extension.to_ascii_uppercase()))
    }
}
