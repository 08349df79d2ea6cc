//! Peer access control.
//!
//! A [`Blocklist`] is an ordered list of address prefixes. A peer is refused
//! service when the textual form of its socket address (`10.0.0.5:1234`)
//! starts with any entry. Entries are plain strings: no IP or CIDR parsing,
//! no case folding.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Ordered list of blocked address prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist {
    entries: Vec<String>,
}

impl Blocklist {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Reads one entry per line.
    ///
    /// Trailing `\r` is dropped and blank lines are skipped, since an empty
    /// prefix would match every peer.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let entry = line.trim_end_matches('\r');
            if entry.is_empty() {
                continue;
            }
            entries.push(entry.to_string());
        }

        Ok(Self { entries })
    }

    /// Loads a blocklist file from disk.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Appends the entries of `other`, keeping order.
    pub fn extend(&mut self, other: Blocklist) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first entry that is a prefix of `peer`, if any.
    ///
    /// An entry longer than `peer` never matches.
    pub fn matching_entry(&self, peer: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(String::as_str)
            .find(|entry| peer.starts_with(entry))
    }

    /// Returns `true` if `peer` starts with any blocked prefix.
    pub fn is_blocked(&self, peer: &str) -> bool {
        self.matching_entry(peer).is_some()
    }
}

impl From<Vec<String>> for Blocklist {
    fn from(entries: Vec<String>) -> Self {
        Self::new(entries)
    }
}

impl<'a> FromIterator<&'a str> for Blocklist {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_string).collect())
    }
}
