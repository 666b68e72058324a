//! TLZC container decoding.
//!
//! Compressed payloads are wrapped in a small TLZC container: a 24-byte
//! header followed by a zlib stream. The zlib bitstream itself is handled by
//! flate2; this module only peels the container.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::{Error, Result};

/// Magic bytes at the start of a TLZC container.
pub const TLZC_MAGIC: [u8; 4] = *b"TLZC";

/// Container header size: magic, version, compressed size, raw size, reserved.
const HEADER_SIZE: usize = 24;

/// Decompress a TLZC container into the original payload bytes.
///
/// Container fields are always little-endian regardless of archive mode.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < HEADER_SIZE {
        return Err(Error::Decode(format!(
            "TLZC container truncated: {} bytes",
            data.len()
        )));
    }

    if data[..4] != TLZC_MAGIC {
        return Err(Error::Decode("missing TLZC magic".to_string()));
    }

    let raw_size = u32::from_le_bytes([data[12], data[13], data[14], data[15]]) as usize;

    let mut output = Vec::with_capacity(raw_size);
    let mut decoder = ZlibDecoder::new(&data[HEADER_SIZE..]);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| Error::Decode(e.to_string()))?;

    if output.len() != raw_size {
        return Err(Error::Decode(format!(
            "TLZC size mismatch: expected {raw_size}, got {}",
            output.len()
        )));
    }

    Ok(output)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    /// Wrap payload bytes in a TLZC container for tests.
    pub(crate) fn compress(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        let stream = encoder.finish().unwrap();

        let mut out = Vec::with_capacity(HEADER_SIZE + stream.len());
        out.extend_from_slice(&TLZC_MAGIC);
        out.extend_from_slice(&0x0101u32.to_le_bytes()); // version
        out.extend_from_slice(&((HEADER_SIZE + stream.len()) as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&[0u8; 8]); // reserved
        out.extend_from_slice(&stream);
        out
    }

    #[test]
    fn test_roundtrip() {
        let original = b"the quick brown fox jumps over the lazy dog";
        let container = compress(original);
        assert_eq!(decompress(&container).unwrap(), original);
    }

    #[test]
    fn test_bad_magic() {
        let mut container = compress(b"data");
        container[0] = b'X';
        assert!(matches!(decompress(&container), Err(Error::Decode(_))));
    }

    #[test]
    fn test_truncated_container() {
        assert!(matches!(decompress(b"TLZC"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_corrupt_stream() {
        let mut container = compress(b"some payload data here");
        let last = container.len() - 1;
        container.truncate(last);
        assert!(matches!(decompress(&container), Err(Error::Decode(_))));
    }
}
