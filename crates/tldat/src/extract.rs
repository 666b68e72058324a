//! Parallel extraction of all entries to an output directory tree.

use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::payload::read_payload;
use crate::{ArchiveHeader, EncryptionContext, Error, NameDictionary};

/// A single entry that failed to extract.
///
/// Carries enough identity for the caller to report without re-parsing.
#[derive(Debug)]
pub struct EntryFailure {
    pub index: u32,
    pub name_hash: u64,
    pub extension: String,
    pub error: Error,
}

/// Outcome of an extraction run.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Entries written successfully.
    pub extracted: usize,
    /// Entries that failed, with their error. Never aborts the batch.
    pub failures: Vec<EntryFailure>,
}

/// Extract every entry into `output/<extension>/<name>`.
///
/// Entries are independent work units processed on the rayon pool in no
/// particular order. Each resolves its name through the (now read-only)
/// dictionary, reads its own payload and writes its own file; the only
/// shared mutable state is the directory tree, created with idempotent
/// `create_dir_all`. `progress` is invoked once per entry from worker
/// threads.
///
/// Two entries resolving to the same path race; the last writer wins, but
/// files land via a private temp file and rename so a completed file is
/// always wholly one source's bytes.
pub fn extract_all<F>(
    header: &ArchiveHeader,
    blob: &[u8],
    ctx: Option<&EncryptionContext>,
    names: &NameDictionary,
    output: &Path,
    progress: F,
) -> ExtractReport
where
    F: Fn() + Sync,
{
    let results: Vec<Option<EntryFailure>> = header
        .entries()
        .par_iter()
        .map(|entry| {
            let result = extract_entry(blob, ctx, names, output, entry);
            progress();
            result.err().map(|error| EntryFailure {
                index: entry.index,
                name_hash: entry.name_hash,
                extension: entry.extension.clone(),
                error,
            })
        })
        .collect();

    let mut report = ExtractReport::default();
    for failure in results.into_iter().flatten() {
        report.failures.push(failure);
    }
    report.extracted = header.len() - report.failures.len();
    report
}

fn extract_entry(
    blob: &[u8],
    ctx: Option<&EncryptionContext>,
    names: &NameDictionary,
    output: &Path,
    entry: &crate::ArchiveEntry,
) -> crate::Result<()> {
    let name = names.name_or_fallback(entry.name_hash, &entry.extension);
    let path = output
        .join(&entry.extension)
        .join(name.replace('\\', "/"));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let payload = read_payload(blob, entry, ctx)?;

    // Write through a per-entry temp file and rename it into place, so a
    // path collision still yields one source's complete bytes.
    let tmp = path.with_extension(format!("{}.part", entry.index));
    fs::write(&tmp, payload.as_ref())?;
    fs::rename(&tmp, &path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::name_hash;
    use crate::header::tests::build_header;
    use tldat_common::HeaderMode;

    #[test]
    fn test_extract_layout_and_fallback_names() {
        let mode = HeaderMode::default();
        let buf = build_header(
            mode,
            &[
                (name_hash("a.tex"), "TEX", 0, 5, false),
                (0xBEEF, "DAT", 5, 3, false),
            ],
        );
        let header = ArchiveHeader::parse(&buf, mode).unwrap();
        let blob = b"hellodat";

        let mut names = NameDictionary::new();
        names.try_add("a.tex");

        let dir = tempfile::tempdir().unwrap();
        let report = extract_all(&header, blob, None, &names, dir.path(), || {});

        assert_eq!(report.extracted, 2);
        assert!(report.failures.is_empty());

        let known = std::fs::read(dir.path().join("TEX").join("a.tex")).unwrap();
        assert_eq!(known, b"hello");

        let fallback = dir.path().join("DAT").join("000000000000beef.DAT");
        assert_eq!(std::fs::read(fallback).unwrap(), b"dat");
    }

    #[test]
    fn test_failure_is_isolated() {
        let mode = HeaderMode::default();
        let buf = build_header(
            mode,
            &[
                (1, "BIN", 0, 4, false),
                (2, "BIN", 100, 4, false), // out of range
            ],
        );
        let header = ArchiveHeader::parse(&buf, mode).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let names = NameDictionary::new();
        let report = extract_all(&header, b"data", None, &names, dir.path(), || {});

        assert_eq!(report.extracted, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(matches!(report.failures[0].error, Error::Io(_)));
    }

    #[test]
    fn test_progress_called_per_entry() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mode = HeaderMode::default();
        let buf = build_header(mode, &[(1, "BIN", 0, 1, false), (2, "BIN", 1, 1, false)]);
        let header = ArchiveHeader::parse(&buf, mode).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let names = NameDictionary::new();
        let ticks = AtomicUsize::new(0);
        extract_all(&header, b"xy", None, &names, dir.path(), || {
            ticks.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(ticks.load(Ordering::Relaxed), 2);
    }
}
