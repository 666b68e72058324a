//! Offline name recovery.
//!
//! Grows a [`NameDictionary`] from partial evidence in a parsed header, via
//! two add-only heuristics:
//!
//! 1. **Dependency mining** - every `*_D` entry is a dependency descriptor
//!    whose payload embeds a table of NUL-terminated names. The broadest net,
//!    run first.
//! 2. **Extension substitution** - a physical entry with a known name often
//!    has a dependency sibling differing only in extension. The swapped name
//!    is accepted only if its hash actually exists in the header.
//!
//! Both passes are monotonic, so running recovery twice yields the same
//! dictionary as running it once. The whole pass is strictly sequential and
//! must complete before parallel extraction starts.

use std::collections::HashMap;

use tldat_common::BinaryReader;

use crate::hash::name_hash;
use crate::payload::read_payload;
use crate::{ArchiveEntry, ArchiveHeader, EncryptionContext, NameDictionary, Result};

/// Suffix marking dependency-descriptor entries.
const DEPEND_SUFFIX: &str = "_D";

/// A physical/dependency extension pairing for the substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPair {
    /// Extension of entries whose names are already known, e.g. `TOTEXP_P`.
    pub physical: String,
    /// Extension to substitute and probe for, e.g. `TOTEXB_D`.
    pub depend: String,
}

impl ExtensionPair {
    pub fn new(physical: &str, depend: &str) -> Self {
        Self {
            physical: physical.to_ascii_uppercase(),
            depend: depend.to_ascii_uppercase(),
        }
    }
}

/// The texture and model pairings used by every known title.
pub fn default_pairs() -> Vec<ExtensionPair> {
    vec![
        ExtensionPair::new("TOTEXP_P", "TOTEXB_D"),
        ExtensionPair::new("TOMDLP_P", "TOMDLB_D"),
    ]
}

/// Run both recovery heuristics with the default extension pairs.
pub fn recover_names(
    header: &ArchiveHeader,
    blob: &[u8],
    ctx: Option<&EncryptionContext>,
    dict: &mut NameDictionary,
) {
    recover_names_with_pairs(header, blob, ctx, dict, &default_pairs());
}

/// Run both recovery heuristics with explicit extension pairs.
///
/// Mining runs first, then one substitution pass per pair. Malformed or
/// unreadable dependency payloads are skipped per entry, never fatal.
pub fn recover_names_with_pairs(
    header: &ArchiveHeader,
    blob: &[u8],
    ctx: Option<&EncryptionContext>,
    dict: &mut NameDictionary,
    pairs: &[ExtensionPair],
) {
    for entry in header.entries() {
        if entry.extension.ends_with(DEPEND_SUFFIX) {
            // Best effort: a truncated table may still have yielded names.
            let _ = mine_depend_entry(header, blob, ctx, entry, dict);
        }
    }

    let by_extension = extension_index(header);
    for pair in pairs {
        substitute_pass(header, &by_extension, pair, dict);
    }
}

/// Parse one dependency descriptor payload and add every listed name.
///
/// Prologue (mode-width fields throughout): a reserved field, the byte
/// offset of the table end relative to the position after that field, and
/// the name count. The table end holds a further skip offset; the name
/// array starts at `table_end + skip`, measured from the table end itself.
fn mine_depend_entry(
    header: &ArchiveHeader,
    blob: &[u8],
    ctx: Option<&EncryptionContext>,
    entry: &ArchiveEntry,
    dict: &mut NameDictionary,
) -> Result<()> {
    let mode = header.mode();
    let payload = read_payload(blob, entry, ctx)?;
    let mut reader = BinaryReader::new(&payload, mode.endian);

    let _reserved = reader.read_uint(mode.width)?;
    let relative = reader.read_uint(mode.width)?;
    let table_end = reader.position().saturating_add(relative as usize);
    let count = reader.read_uint(mode.width)?;

    reader.seek(table_end);
    let skip = reader.read_uint(mode.width)?;
    reader.seek(table_end.saturating_add(skip as usize));

    for _ in 0..count {
        let name = reader.read_cstring()?;
        dict.try_add(name);
    }

    Ok(())
}

/// One substitution pass: for each physical entry with a known name, probe
/// the header for a dependency sibling under the swapped extension.
fn substitute_pass(
    header: &ArchiveHeader,
    by_extension: &HashMap<&str, Vec<&ArchiveEntry>>,
    pair: &ExtensionPair,
    dict: &mut NameDictionary,
) {
    let Some(entries) = by_extension.get(pair.physical.as_str()) else {
        return;
    };

    let mut accepted = Vec::new();
    for entry in entries {
        let Some(name) = dict.get(entry.name_hash, &entry.extension) else {
            continue;
        };

        let candidate = swap_extension(name, &pair.depend);
        if header.entry_exists(name_hash(&candidate), &pair.depend) {
            accepted.push(candidate);
        }
    }

    for candidate in accepted {
        dict.try_add(&candidate);
    }
}

/// Auxiliary extension -> entries index, built once per recovery run.
fn extension_index(header: &ArchiveHeader) -> HashMap<&str, Vec<&ArchiveEntry>> {
    let mut index: HashMap<&str, Vec<&ArchiveEntry>> = HashMap::new();
    for entry in header.entries() {
        index.entry(entry.extension.as_str()).or_default().push(entry);
    }
    index
}

/// Replace the extension of a name, preserving the stem. The extension is
/// appended exactly as given.
fn swap_extension(name: &str, extension: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.{extension}"),
        None => format!("{name}.{extension}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::tests::{build_header, push_uint};
    use tldat_common::HeaderMode;

    /// Build a dependency descriptor payload listing the given names.
    ///
    /// `padding` bytes sit between the skip field and the name array; the
    /// skip offset is measured from the table end, so it covers the skip
    /// field itself plus the padding.
    pub(crate) fn build_depend_payload(mode: HeaderMode, names: &[&str], padding: usize) -> Vec<u8> {
        let field = mode.width.field_size();
        let mut buf = Vec::new();

        push_uint(&mut buf, mode, 0); // reserved
        // Table end sits immediately after the count field.
        push_uint(&mut buf, mode, field as u64);
        push_uint(&mut buf, mode, names.len() as u64);
        push_uint(&mut buf, mode, (field + padding) as u64); // skip offset
        buf.extend(std::iter::repeat(0xEEu8).take(padding));

        for name in names {
            buf.extend_from_slice(name.as_bytes());
            buf.push(0);
        }
        buf
    }

    fn scenario() -> (ArchiveHeader, Vec<u8>) {
        let mode = HeaderMode::default();
        let depend = build_depend_payload(mode, &["a.tex"], 0);

        let buf = build_header(
            mode,
            &[
                (name_hash("a.tex"), "TEX", 0, 10, false),
                (name_hash("a.tex_d"), "TEX_D", 10, depend.len() as u64, false),
            ],
        );
        let header = ArchiveHeader::parse(&buf, mode).unwrap();

        let mut blob = vec![0xEEu8; 10];
        blob.extend_from_slice(&depend);
        (header, blob)
    }

    #[test]
    fn test_mining_recovers_listed_names() {
        let (header, blob) = scenario();
        let mut dict = NameDictionary::new();
        recover_names(&header, &blob, None, &mut dict);

        let hash = name_hash("a.tex");
        assert_eq!(dict.get(hash, "TEX"), Some("a.tex"));
        assert_eq!(dict.name_or_fallback(hash, "TEX"), "a.tex");
    }

    #[test]
    fn test_name_table_offset_measured_from_table_end() {
        let mode = HeaderMode::default();
        // Skip offset larger than its own field: padding sits between the
        // skip field and the first name.
        let depend = build_depend_payload(mode, &["chara/a.tex"], 12);
        let buf = build_header(
            mode,
            &[(name_hash("x.tex_d"), "TEX_D", 0, depend.len() as u64, false)],
        );
        let header = ArchiveHeader::parse(&buf, mode).unwrap();

        let mut dict = NameDictionary::new();
        recover_names(&header, &depend, None, &mut dict);

        assert_eq!(
            dict.get(name_hash("chara/a.tex"), "TEX"),
            Some("chara/a.tex")
        );
    }

    #[test]
    fn test_recovery_is_idempotent() {
        let (header, blob) = scenario();

        let mut once = NameDictionary::new();
        recover_names(&header, &blob, None, &mut once);

        let mut twice = once.clone();
        recover_names(&header, &blob, None, &mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_malformed_depend_entry_is_skipped() {
        let mode = HeaderMode::default();
        // Depend payload far too short for its prologue.
        let buf = build_header(
            mode,
            &[
                (name_hash("a.tex_d"), "TEX_D", 0, 4, false),
                (name_hash("b.tex_d"), "TEX_D", 4, 0, false),
            ],
        );
        let header = ArchiveHeader::parse(&buf, mode).unwrap();

        let mut dict = NameDictionary::new();
        recover_names(&header, &[0u8; 4], None, &mut dict);
        assert!(dict.is_empty());
    }

    #[test]
    fn test_substitution_accepts_existing_sibling() {
        let mode = HeaderMode::default();
        let buf = build_header(
            mode,
            &[
                (name_hash("a.totexp_p"), "TOTEXP_P", 0, 0, false),
                (name_hash("a.totexb_d"), "TOTEXB_D", 0, 0, false),
            ],
        );
        let header = ArchiveHeader::parse(&buf, mode).unwrap();

        let mut dict = NameDictionary::new();
        dict.try_add("a.totexp_p");
        recover_names(&header, &[], None, &mut dict);

        // The candidate carries the pair's extension as configured.
        assert_eq!(
            dict.get(name_hash("a.totexb_d"), "TOTEXB_D"),
            Some("a.TOTEXB_D")
        );
    }

    #[test]
    fn test_substitution_requires_header_match() {
        let mode = HeaderMode::default();
        // Physical entry only, no dependency sibling in the header.
        let buf = build_header(mode, &[(name_hash("a.totexp_p"), "TOTEXP_P", 0, 0, false)]);
        let header = ArchiveHeader::parse(&buf, mode).unwrap();

        let mut dict = NameDictionary::new();
        dict.try_add("a.totexp_p");
        recover_names(&header, &[], None, &mut dict);

        assert_eq!(dict.get(name_hash("a.totexb_d"), "TOTEXB_D"), None);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_substitution_skips_unknown_physical_names() {
        let mode = HeaderMode::default();
        let buf = build_header(
            mode,
            &[
                (name_hash("a.totexp_p"), "TOTEXP_P", 0, 0, false),
                (name_hash("a.totexb_d"), "TOTEXB_D", 0, 0, false),
            ],
        );
        let header = ArchiveHeader::parse(&buf, mode).unwrap();

        // Physical name never learned, so nothing to substitute from.
        let mut dict = NameDictionary::new();
        recover_names(&header, &[], None, &mut dict);
        assert!(dict.is_empty());
    }
}
