use crate::automaton::*;
use crate::dust::*;
use crate::errors::*;
use crate::matcher::*;
use crate::patterns::ReadClass;

/// Per-read decision policy over the matching engine and the dust scorer.
///
/// Checks run in a fixed order, short-circuiting on the first failure:
/// length cutoff, then complexity cutoff, then pattern match (exact or
/// approximate depending on the automaton's error budget). Classification is
/// a pure function of the read bytes, so one classifier can serve any number
/// of reads, in any order, from any number of threads.
#[derive(Debug)]
pub struct Classifier {
    automaton: Automaton,
    min_length: usize,
    dust_window: usize,
    dust_cutoff: f64,
}

impl Classifier {
    /// A `min_length` or `dust_cutoff` of zero disables that check. The dust
    /// window is validated here so that a window the rolling hash cannot
    /// represent is caught at setup instead of mid-run.
    pub fn new(
        automaton: Automaton,
        min_length: usize,
        dust_window: usize,
        dust_cutoff: f64,
    ) -> Result<Self> {
        if dust_cutoff > 0.0 && !(1..=MAX_WINDOW).contains(&dust_window) {
            return Err(Error::DustWindow(dust_window));
        }
        Ok(Self {
            automaton,
            min_length,
            dust_window,
            dust_cutoff,
        })
    }

    pub fn classify(&self, seq: &[u8]) -> ReadClass {
        if self.min_length > 0 && seq.len() < self.min_length {
            return ReadClass::TooShort;
        }
        if self.dust_cutoff > 0.0 && dust_score(seq, self.dust_window) > self.dust_cutoff {
            return ReadClass::LowComplexity;
        }

        let hit = if self.automaton.errors().is_exact() {
            search_any(&self.automaton, seq)
        } else {
            search_inexact(&self.automaton, seq)
        };
        hit.unwrap_or(ReadClass::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::*;

    fn classifier(
        kmers: &[&str],
        poly_len: usize,
        errors: u8,
        min_length: usize,
        dust_window: usize,
        dust_cutoff: f64,
    ) -> Classifier {
        let set = PatternSet::from_adapter_lines(kmers.iter().copied(), false, poly_len).unwrap();
        let automaton = Automaton::build(set, ErrorBudget::new(errors).unwrap());
        Classifier::new(automaton, min_length, dust_window, dust_cutoff).unwrap()
    }

    #[test]
    fn checks_run_in_fixed_order() {
        let c = classifier(&["AGATCGGAAGAGC"], 0, 0, 10, 0, 0.0);

        assert_eq!(c.classify(b"AGATCGGAAGAGCTTTT"), ReadClass::Adapter);
        assert_eq!(c.classify(b"TTTTTTTTTTTTTTTT"), ReadClass::Ok);
        // shorter than the cutoff, even though it is an adapter prefix
        assert_eq!(c.classify(b"AGAT"), ReadClass::TooShort);
    }

    #[test]
    fn length_check_dominates_pattern_content() {
        let c = classifier(&["AGATCGGAAGAGC"], 0, 0, 50, 0, 0.0);
        assert_eq!(c.classify(b"AGATCGGAAGAGC"), ReadClass::TooShort);
    }

    #[test]
    fn complexity_check_runs_before_pattern_match() {
        // a polyG tail is also low-complexity; the dust check wins
        let c = classifier(&[], 5, 0, 0, 4, 0.5);
        assert_eq!(
            c.classify(b"GGGGGGGGGGGGGGGGGGGGGGGGGGGGGG"),
            ReadClass::LowComplexity
        );

        // with dust disabled the same read is a polyG match
        let c = classifier(&[], 5, 0, 0, 4, 0.0);
        assert_eq!(
            c.classify(b"GGGGGGGGGGGGGGGGGGGGGGGGGGGGGG"),
            ReadClass::PolyG
        );
    }

    #[test]
    fn homopolymer_leading_run() {
        let c = classifier(&["AGATCGGAAGAGC"], 5, 0, 0, 0, 0.0);
        assert_eq!(c.classify(b"GGGGGACGTACGT"), ReadClass::PolyG);
    }

    #[test]
    fn approximate_matching_used_when_errors_allowed() {
        let c = classifier(&["ACGTACGTAC"], 0, 1, 10, 0, 0.0);
        assert_eq!(c.classify(b"ACGTTCGTAC"), ReadClass::Adapter);
    }

    #[test]
    fn classification_is_idempotent() {
        let c = classifier(&["ACGTACGTAC"], 5, 1, 10, 4, 2.0);
        let reads: [&[u8]; 4] = [
            b"ACGTTCGTAC",
            b"TTAGGCTTAGGCTTAGGC",
            b"ACGT",
            b"GGGGGGGGGGGGGGGGGGGGGGGGGGGGGG",
        ];

        for read in reads {
            assert_eq!(c.classify(read), c.classify(read));
        }
    }
}
