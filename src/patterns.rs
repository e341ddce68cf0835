use memchr::memchr;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::*;

/// Label assigned to a read by the classifier.
///
/// Pattern terminals in the automaton carry one of `Adapter`, `AmbiguousBase`,
/// `PolyG`, or `PolyC`; the remaining labels are produced by the per-read
/// checks that run before pattern matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadClass {
    Ok,
    Adapter,
    AmbiguousBase,
    PolyG,
    PolyC,
    TooShort,
    LowComplexity,
}

impl ReadClass {
    pub fn is_kept(self) -> bool {
        self == ReadClass::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub bytes: Vec<u8>,
    pub class: ReadClass,
}

/// The working set of patterns to search for: adapter kmers plus the optional
/// ambiguous-base and homopolymer filters.
///
/// A pattern's identity is its index in the set. Indices are assigned at
/// construction and never reused or reordered.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn new(patterns: Vec<Pattern>) -> Result<Self> {
        if patterns.is_empty() {
            return Err(Error::EmptyPatternSet);
        }
        Ok(Self { patterns })
    }

    /// Reads adapter kmers from a file (one per line, optional tab-delimited
    /// trailing field ignored) and appends the built-in filter patterns.
    pub fn from_adapter_file(
        path: impl AsRef<Path>,
        filter_n: bool,
        poly_len: usize,
    ) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| io_err(path, e))?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            lines.push(line.map_err(|e| io_err(path, e))?);
        }

        Self::from_adapter_lines(lines.iter().map(String::as_str), filter_n, poly_len)
    }

    /// Builds the pattern set from adapter lines plus the optional filters.
    ///
    /// Adapter kmers are uppercased so matching is case-insensitive. Empty
    /// lines are skipped. The set is empty only if the adapter list yields no
    /// kmers and both optional filters are disabled, which is an error.
    pub fn from_adapter_lines<'a>(
        lines: impl IntoIterator<Item = &'a str>,
        filter_n: bool,
        poly_len: usize,
    ) -> Result<Self> {
        let mut patterns = Vec::new();

        for line in lines {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let bytes = line.as_bytes();
            let kmer = match memchr(b'\t', bytes) {
                Some(tab) => &bytes[..tab],
                None => bytes,
            };
            if kmer.is_empty() {
                continue;
            }
            patterns.push(Pattern {
                bytes: kmer.to_ascii_uppercase(),
                class: ReadClass::Adapter,
            });
        }

        if filter_n {
            patterns.push(Pattern {
                bytes: b"N".to_vec(),
                class: ReadClass::AmbiguousBase,
            });
        }
        if poly_len > 0 {
            patterns.push(Pattern {
                bytes: vec![b'G'; poly_len],
                class: ReadClass::PolyG,
            });
            patterns.push(Pattern {
                bytes: vec![b'C'; poly_len],
                class: ReadClass::PolyC,
            });
        }

        Self::new(patterns)
    }

    pub fn get(&self, id: usize) -> &Pattern {
        &self.patterns[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn io_err(path: &Path, e: std::io::Error) -> Error {
    Error::FileIo {
        file: path.display().to_string(),
        source: Box::new(e),
    }
}
