//! Rust library for filtering contaminated sequencing reads.
//!
//! # Overview
//! readsieve classifies fastq records as clean or contaminated by scanning
//! each read against a library of known contaminant subsequences (sequencing
//! adapters), fixed patterns for ambiguous bases and homopolymer tails, and a
//! low-complexity score. Reads failing any check are diverted to a rejection
//! stream; reads passing all checks are kept.
//!
//! The matching engine is a shared trie automaton with failure links that
//! searches for every pattern simultaneously in one pass over the read. It
//! supports exact search and a bounded-substitution approximate search (up to
//! two mismatches): adapter patterns are split into segments inserted as
//! independent paths, segment hits seed candidate positions cheaply during
//! the scan, and only those candidates are verified byte-by-byte afterwards.
//!
//! ## Classification
//! Each read receives exactly one label, decided in a fixed order:
//! * [`ReadClass::TooShort`] if a minimum length is configured and the read
//!   is shorter,
//! * [`ReadClass::LowComplexity`] if a dust cutoff is configured and the
//!   read's [`dust_score`] exceeds it,
//! * the label of the first pattern found by the automaton
//!   ([`ReadClass::Adapter`], [`ReadClass::AmbiguousBase`],
//!   [`ReadClass::PolyG`], [`ReadClass::PolyC`]),
//! * [`ReadClass::Ok`] otherwise.
//!
//! The automaton is built once at startup and is immutable afterwards, so it
//! can be shared read-only across threads; classification keeps no per-read
//! state anywhere but the stack.
//!
//! ## Example
//! ```no_run
//! use readsieve::*;
//!
//! # fn run() -> Result<()> {
//! let patterns = PatternSet::from_adapter_file("adapters.dat", false, 13)?;
//! let automaton = Automaton::build(patterns, ErrorBudget::new(1)?);
//! let classifier = Classifier::new(automaton, 50, 4, 0.0)?;
//!
//! assert_eq!(classifier.classify(b"ACGT"), ReadClass::TooShort);
//! # Ok(())
//! # }
//! ```

pub mod automaton;
pub mod classify;
pub mod dust;
pub mod errors;
pub mod fastq;
pub mod filter;
pub mod matcher;
pub mod patterns;
pub mod stats;

// commonly used functions and types

pub use crate::automaton::*;
pub use crate::classify::*;
pub use crate::dust::*;
pub use crate::errors::*;
pub use crate::fastq::*;
pub use crate::filter::*;
pub use crate::matcher::*;
pub use crate::patterns::*;
pub use crate::stats::*;
