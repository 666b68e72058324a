//! Payload materialization: slicing, decryption and decompression.

use std::borrow::Cow;

use crate::{crypt, tlzc, ArchiveEntry, EncryptionContext, Error, Result};

/// Materialize one entry's payload bytes.
///
/// Without a resolvable key the payload is returned as a zero-copy slice of
/// the blob, even if the compressed flag is set: unencrypted archives store
/// payloads in their final form. With a key, the slice is copied, decrypted
/// in place, and unwrapped from its TLZC container when compressed.
///
/// Out-of-range slices are I/O errors; codec failures are decode errors.
/// Both are isolated to this entry.
pub fn read_payload<'a>(
    blob: &'a [u8],
    entry: &ArchiveEntry,
    ctx: Option<&EncryptionContext>,
) -> Result<Cow<'a, [u8]>> {
    let start = entry.offset as usize;
    let end = entry
        .offset
        .checked_add(entry.length)
        .map(|e| e as usize)
        .filter(|&e| e <= blob.len() && start <= e)
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "payload range {}..{} out of bounds (blob is {} bytes)",
                    entry.offset,
                    entry.offset.saturating_add(entry.length),
                    blob.len()
                ),
            ))
        })?;

    let slice = &blob[start..end];

    let Some(key) = ctx.and_then(|c| c.file_key(entry.index)) else {
        return Ok(Cow::Borrowed(slice));
    };

    let mut buffer = slice.to_vec();
    crypt::decrypt(&mut buffer, key);

    if entry.is_compressed {
        tlzc::decompress(&buffer).map(Cow::Owned)
    } else {
        Ok(Cow::Owned(buffer))
    }
}
