//! TLDAT archive reader.
//!
//! TLDAT archives package game assets as two companion files: a header table
//! (`FILEHEADER.TOFHDB`) describing every packed file, and a flat blob
//! (`TLFILE.TLDAT`) holding the concatenated payloads. The header records no
//! file names, only truncated 64-bit name hashes, so original names are
//! reconstructed from partial evidence:
//!
//! - a trusted newline-delimited dictionary file,
//! - name tables embedded in `*_D` dependency payloads,
//! - extension substitution against known physical-file names.
//!
//! Later releases encrypt the header and individual payloads; the key
//! material ships in a companion buffer decoded by [`EncryptionContext`].
//!
//! # Example
//!
//! ```no_run
//! use tldat::{ArchiveHeader, Blob, HeaderMode, NameDictionary};
//!
//! let header_bytes = std::fs::read("FILEHEADER.TOFHDB")?;
//! let header = ArchiveHeader::parse(&header_bytes, HeaderMode::default())?;
//! let blob = Blob::open("TLFILE.TLDAT")?;
//!
//! let mut names = NameDictionary::new();
//! tldat::recover_names(&header, &blob, None, &mut names);
//!
//! for entry in header.entries() {
//!     println!("{}", names.name_or_fallback(entry.name_hash, &entry.extension));
//! }
//! # Ok::<(), tldat::Error>(())
//! ```

mod blob;
mod crypt;
mod error;
mod extract;
pub mod hash;
mod header;
mod names;
mod payload;
mod recover;
mod tlzc;

pub use blob::Blob;
pub use crypt::{decrypt, EncryptionContext, BOOTSTRAP_KEY, KEY_LEN};
pub use error::{Error, Result};
pub use extract::{extract_all, EntryFailure, ExtractReport};
pub use header::{ArchiveEntry, ArchiveHeader};
pub use names::NameDictionary;
pub use payload::read_payload;
pub use recover::{default_pairs, recover_names, recover_names_with_pairs, ExtensionPair};

/// Re-export the decode mode types for downstream callers.
pub use tldat_common::{Endian, HeaderMode, Width};
