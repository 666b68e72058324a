//! Name hashing for TLDAT entries.
//!
//! Header records identify files by a 64-bit hash of the normalized relative
//! path instead of storing the name. The hash is the join key between header
//! entries and the name dictionary, so the algorithm and its constants must
//! match the packing tool exactly.

const HASH_SEED: u64 = 0xcbf2_9ce4_8422_2325;
const HASH_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Compute the 64-bit hash of a file name.
///
/// Names are normalized before hashing: ASCII letters are folded to
/// uppercase and backslashes become forward slashes, so the hash is
/// case- and separator-insensitive.
pub fn name_hash(name: &str) -> u64 {
    let mut hash = HASH_SEED;
    for byte in name.bytes() {
        let byte = match byte {
            b'\\' => b'/',
            b => b.to_ascii_uppercase(),
        };
        hash ^= byte as u64;
        hash = hash.wrapping_mul(HASH_PRIME);
    }
    hash
}
