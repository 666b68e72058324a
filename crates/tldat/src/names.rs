//! Name dictionary mapping (hash, extension) pairs back to file names.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::hash::name_hash;
use crate::Result;

/// Recovered file names keyed by `(name_hash, uppercase extension)`.
///
/// Mutated only during the sequential pre-pass (dictionary loading and name
/// recovery), then treated as read-only during parallel extraction.
///
/// Distinct true names sharing a 64-bit hash are indistinguishable; the
/// first writer wins. This is an accepted limitation inherited from the
/// archive format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameDictionary {
    names: HashMap<(u64, String), String>,
}

impl NameDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of known names.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no names are known.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add a candidate name, keyed by its own hash and extension.
    ///
    /// Idempotent: re-adding a known `(hash, extension)` is a no-op.
    /// Returns whether the name was newly inserted.
    pub fn try_add(&mut self, full_name: &str) -> bool {
        let name = full_name.trim();
        if name.is_empty() {
            return false;
        }

        let key = (name_hash(name), extension_of(name));
        if self.names.contains_key(&key) {
            return false;
        }

        self.names.insert(key, name.to_string());
        true
    }

    /// Look up a name by hash and extension (extension case-insensitive).
    pub fn get(&self, name_hash: u64, extension: &str) -> Option<&str> {
        self.names
            .get(&(name_hash, extension.to_ascii_uppercase()))
            .map(String::as_str)
    }

    /// Look up a name, or synthesize the hex-hash fallback.
    ///
    /// The fallback is exactly `{hash:016x}.{extension}`, so every entry is
    /// nameable even without dictionary evidence.
    pub fn name_or_fallback(&self, name_hash: u64, extension: &str) -> String {
        match self.get(name_hash, extension) {
            Some(name) => name.to_string(),
            None => format!("{name_hash:016x}.{extension}"),
        }
    }

    /// Add every line of a newline-delimited name list.
    ///
    /// Blank lines are tolerated. Returns the number of names newly added.
    pub fn add_names(&mut self, text: &str) -> usize {
        text.lines().filter(|line| self.try_add(line)).count()
    }

    /// Load candidate names from a dictionary file.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.add_names(&text))
    }

    /// Write all known names, one per line, sorted for stable output.
    ///
    /// The result round-trips through [`NameDictionary::load_from_file`].
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        for name in names {
            writeln!(out, "{name}")?;
        }
        Ok(())
    }

    /// Iterate over `((hash, extension), name)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str, &str)> {
        self.names
            .iter()
            .map(|((hash, ext), name)| (*hash, ext.as_str(), name.as_str()))
    }
}

/// The uppercase extension token of a name: everything after the last dot.
fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_uppercase())
        .unwrap_or_default()
}
