//! TLDAT decryption.
//!
//! Encrypted archives ship a companion key-material buffer next to the
//! header. Decrypting that buffer with a fixed bootstrap key yields the
//! header key followed by a per-entry key table aligned by entry index.
//!
//! The cipher itself is a symmetric byte-stream XOR: a 64-bit multiplicative
//! keystream seeded from an 8-byte key. The constants are an external
//! contract fixed by the game client, not a design choice.

use crate::{Error, Result};

/// Length in bytes of every key in the scheme.
pub const KEY_LEN: usize = 8;

/// Keystream generator constants.
const STREAM_MUL: u64 = 0x5d58_8b65_6c07_8965;
const STREAM_ADD: u64 = 0x0000_0000_0026_9ec3;

/// Bootstrap key protecting the companion key-material buffer.
///
/// This is hardcoded in the game client and is not a secret.
pub const BOOTSTRAP_KEY: [u8; KEY_LEN] = [0x8c, 0x35, 0xf7, 0x92, 0x1b, 0xe0, 0x6d, 0x4a];

/// Apply the TLDAT stream cipher in place.
///
/// The transform is its own inverse, so this both encrypts and decrypts.
pub fn decrypt(data: &mut [u8], key: [u8; KEY_LEN]) {
    let mut state = u64::from_le_bytes(key);
    for byte in data.iter_mut() {
        state = state.wrapping_mul(STREAM_MUL).wrapping_add(STREAM_ADD);
        *byte ^= (state >> 56) as u8;
    }
}

/// Decoded key material for an encrypted archive.
///
/// Wholly optional: unencrypted archives have no companion buffer and no
/// `EncryptionContext`.
#[derive(Debug, Clone)]
pub struct EncryptionContext {
    header_key: [u8; KEY_LEN],
    file_keys: Vec<[u8; KEY_LEN]>,
}

impl EncryptionContext {
    /// Decode an encrypted companion buffer.
    ///
    /// Layout after the bootstrap decrypt: the header key, then one key per
    /// entry in header order. A trailing partial key is ignored.
    pub fn new(mut companion: Vec<u8>) -> Result<Self> {
        if companion.len() < KEY_LEN {
            return Err(Error::Format(format!(
                "key material too short: {} bytes",
                companion.len()
            )));
        }

        decrypt(&mut companion, BOOTSTRAP_KEY);

        let mut header_key = [0u8; KEY_LEN];
        header_key.copy_from_slice(&companion[..KEY_LEN]);

        let file_keys = companion[KEY_LEN..]
            .chunks_exact(KEY_LEN)
            .map(|chunk| {
                let mut key = [0u8; KEY_LEN];
                key.copy_from_slice(chunk);
                key
            })
            .collect();

        Ok(Self {
            header_key,
            file_keys,
        })
    }

    /// The key decrypting the header buffer.
    #[inline]
    pub fn header_key(&self) -> [u8; KEY_LEN] {
        self.header_key
    }

    /// Look up the payload key for an entry index.
    ///
    /// An out-of-range index means "no key", not an error: such entries are
    /// stored in the clear.
    #[inline]
    pub fn file_key(&self, index: u32) -> Option<[u8; KEY_LEN]> {
        self.file_keys.get(index as usize).copied()
    }
}
