use rustc_hash::FxHashMap;

use crate::automaton::*;
use crate::patterns::ReadClass;

/// Scans `text` through the automaton and returns the first classification
/// reached, or `None` if no pattern occurs in the text.
///
/// After each advance the current node's failure chain is walked outward
/// toward the root, so the longest pattern ending at the current position is
/// found first; the scan short-circuits on the first hit overall.
pub fn search_any(automaton: &Automaton, text: &[u8]) -> Option<ReadClass> {
    let mut state = ROOT;
    for &b in text {
        state = automaton.advance(state, b.to_ascii_uppercase());
        if let Some(class) = first_label(automaton, state) {
            return Some(class);
        }
    }
    None
}

fn first_label(automaton: &Automaton, state: NodeId) -> Option<ReadClass> {
    let mut curr = state;
    while automaton.fail(curr) != curr {
        if let Some(class) = automaton.label(curr) {
            return Some(class);
        }
        curr = automaton.fail(curr);
    }
    None
}

/// Checkpoint hits recorded while scanning a single read: pattern id to
/// (text position, checkpoint offset) pairs, in scan order. Created fresh per
/// read and discarded after classification.
#[derive(Debug, Default)]
struct MatchAccumulator {
    hits: FxHashMap<usize, Vec<(usize, usize)>>,
}

impl MatchAccumulator {
    fn record(&mut self, pattern: usize, pos: usize, offset: usize) {
        self.hits.entry(pattern).or_default().push((pos, offset));
    }

    fn contains(&self, pattern: usize, pos: usize, offset: usize) -> bool {
        let Some(hits) = self.hits.get(&pattern) else {
            return false;
        };
        // hits are appended in scan order, so they are sorted by position
        let mut i = hits.partition_point(|&(p, _)| p < pos);
        while i < hits.len() && hits[i].0 == pos {
            if hits[i].1 == offset {
                return true;
            }
            i += 1;
        }
        false
    }

    fn patterns(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.hits.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn hits(&self, pattern: usize) -> &[(usize, usize)] {
        self.hits.get(&pattern).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Substitution-tolerant scan. Non-adapter patterns behave exactly as in
/// [`search_any`]; adapter patterns are confirmed through their segment
/// checkpoints, either inline when every segment of a span matched exactly,
/// or by a verification pass over the seeded candidate positions once the
/// whole text has been scanned.
pub fn search_inexact(automaton: &Automaton, text: &[u8]) -> Option<ReadClass> {
    let mut acc = MatchAccumulator::default();
    let mut state = ROOT;

    for (i, &b) in text.iter().enumerate() {
        state = automaton.advance(state, b.to_ascii_uppercase());

        let mut curr = state;
        while automaton.fail(curr) != curr {
            if let Some(class) = automaton.label(curr) {
                if class != ReadClass::Adapter {
                    return Some(class);
                }
            }
            for &Checkpoint { pattern, offset } in automaton.checkpoints(curr) {
                acc.record(pattern, i, offset);
                if confirmed_inline(automaton, &acc, pattern, i, offset) {
                    return Some(ReadClass::Adapter);
                }
            }
            curr = automaton.fail(curr);
        }
    }

    verify_candidates(automaton, text, &acc)
}

/// Tests whether the hit just recorded completes a set of checkpoints that
/// are mutually consistent with a single span of the original pattern. The
/// span is anchored at the latest hit; every other required checkpoint
/// position must already be in the accumulator.
fn confirmed_inline(
    automaton: &Automaton,
    acc: &MatchAccumulator,
    pattern: usize,
    pos: usize,
    offset: usize,
) -> bool {
    let Some(begin) = pos.checked_sub(offset) else {
        return false;
    };
    let len = automaton.pattern(pattern).bytes.len();
    segment_spans(len, automaton.errors().get())
        .iter()
        .all(|&(_, t)| acc.contains(pattern, begin + t - 1, t - 1))
}

/// Post-scan confirmation of seeded candidates: for every recorded hit,
/// anchor the pattern at the implied start position and count substitution
/// mismatches over the segments not already matched exactly by a checkpoint.
/// Candidates are tried in recorded order per pattern; the first one within
/// budget wins.
fn verify_candidates(
    automaton: &Automaton,
    text: &[u8],
    acc: &MatchAccumulator,
) -> Option<ReadClass> {
    let budget = automaton.errors().get();

    for pattern in acc.patterns() {
        let bytes = &automaton.pattern(pattern).bytes;
        let spans = segment_spans(bytes.len(), budget);

        for &(pos, offset) in acc.hits(pattern) {
            let Some(begin) = pos.checked_sub(offset) else {
                continue;
            };
            if begin + bytes.len() > text.len() {
                continue;
            }

            let mut mismatches = 0;
            for &(s, t) in &spans {
                if acc.contains(pattern, begin + t - 1, t - 1) {
                    continue;
                }
                mismatches +=
                    count_mismatches(&text[begin + s..begin + t], &bytes[s..t], budget - mismatches);
                if mismatches > budget {
                    break;
                }
            }
            if mismatches <= budget {
                return Some(ReadClass::Adapter);
            }
        }
    }

    None
}

fn count_mismatches(text: &[u8], pattern: &[u8], limit: usize) -> usize {
    let mut mismatches = 0;
    for (&t, &p) in text.iter().zip(pattern) {
        if t.to_ascii_uppercase() != p {
            mismatches += 1;
            if mismatches > limit {
                break;
            }
        }
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::*;

    fn build(kmers: &[&str], filter_n: bool, poly_len: usize, errors: u8) -> Automaton {
        let set = PatternSet::from_adapter_lines(kmers.iter().copied(), filter_n, poly_len)
            .unwrap();
        Automaton::build(set, ErrorBudget::new(errors).unwrap())
    }

    #[test]
    fn exact_finds_adapter_anywhere_in_text() {
        let automaton = build(&["AGATCGGAAGAGC"], false, 0, 0);

        assert_eq!(
            search_any(&automaton, b"AGATCGGAAGAGCTTTT"),
            Some(ReadClass::Adapter)
        );
        assert_eq!(
            search_any(&automaton, b"TTTTAGATCGGAAGAGC"),
            Some(ReadClass::Adapter)
        );
        assert_eq!(search_any(&automaton, b"TTTTTTTTTTTTTTTT"), None);
    }

    #[test]
    fn exact_is_case_insensitive() {
        let automaton = build(&["AGATCGGAAGAGC"], false, 0, 0);
        assert_eq!(
            search_any(&automaton, b"ttagatcggaagagctt"),
            Some(ReadClass::Adapter)
        );
    }

    #[test]
    fn exact_finds_builtin_patterns() {
        let automaton = build(&["AGATCGGAAGAGC"], true, 5, 0);

        assert_eq!(
            search_any(&automaton, b"GGGGGACGTACGT"),
            Some(ReadClass::PolyG)
        );
        assert_eq!(
            search_any(&automaton, b"ACGTACCCCCC"),
            Some(ReadClass::PolyC)
        );
        assert_eq!(
            search_any(&automaton, b"ACGTNACGT"),
            Some(ReadClass::AmbiguousBase)
        );
    }

    #[test]
    fn exact_reports_match_spanning_failure_transition() {
        // GCGT shares the GC prefix with GCGC; the scan must recover via
        // failure links and still find GCGC later in the text
        let automaton = build(&["GCGC"], false, 0, 0);
        assert_eq!(search_any(&automaton, b"GCGTGCGC"), Some(ReadClass::Adapter));
    }

    #[test]
    fn inexact_confirms_exact_occurrence_inline() {
        let automaton = build(&["ACGTACGTAC"], false, 0, 1);
        assert_eq!(
            search_inexact(&automaton, b"ACGTACGTAC"),
            Some(ReadClass::Adapter)
        );
    }

    #[test]
    fn inexact_tolerates_one_substitution() {
        let automaton = build(&["ACGTACGTAC"], false, 0, 1);

        // substitution at offset 4 breaks the first segment; the second
        // segment's checkpoint seeds the verification pass
        assert_eq!(
            search_inexact(&automaton, b"ACGTTCGTAC"),
            Some(ReadClass::Adapter)
        );
        // substitution in the second segment instead
        assert_eq!(
            search_inexact(&automaton, b"ACGTACGTAA"),
            Some(ReadClass::Adapter)
        );
        // embedded in a longer read
        assert_eq!(
            search_inexact(&automaton, b"TTTTACGTTCGTACTTTT"),
            Some(ReadClass::Adapter)
        );
    }

    #[test]
    fn inexact_rejects_too_many_substitutions() {
        let automaton = build(&["ACGTACGTAC"], false, 0, 1);

        // two substitutions, one per segment, exceed a budget of one
        assert_eq!(search_inexact(&automaton, b"ACGTTCGAAC"), None);
    }

    #[test]
    fn inexact_tolerates_two_substitutions() {
        let automaton = build(&["AGATCGGAAGAG"], false, 0, 2);

        // substitutions at offsets 1 and 5 hit the first two segments; the
        // third segment checkpoint anchors the candidate
        assert_eq!(
            search_inexact(&automaton, b"ATATCCGAAGAG"),
            Some(ReadClass::Adapter)
        );
        // three substitutions leave no segment intact
        assert_eq!(search_inexact(&automaton, b"ATATCCGAATAG"), None);
    }

    #[test]
    fn inexact_ignores_lone_final_segment() {
        // the last segment's terminal carries the adapter label, but a text
        // containing only that segment must not classify as a match
        let automaton = build(&["ACGTACGTAC"], false, 0, 1);
        assert_eq!(search_inexact(&automaton, b"CGTAC"), None);
        assert_eq!(search_inexact(&automaton, b"TTTTCGTACTT"), None);
    }

    #[test]
    fn inexact_returns_non_adapter_labels_immediately() {
        let automaton = build(&["ACGTACGTAC"], true, 5, 1);

        assert_eq!(
            search_inexact(&automaton, b"ACGNACGTACGT"),
            Some(ReadClass::AmbiguousBase)
        );
        assert_eq!(
            search_inexact(&automaton, b"ATATGGGGGATAT"),
            Some(ReadClass::PolyG)
        );
    }

    #[test]
    fn inexact_is_case_insensitive() {
        let automaton = build(&["ACGTACGTAC"], false, 0, 1);
        assert_eq!(
            search_inexact(&automaton, b"acgttcgtac"),
            Some(ReadClass::Adapter)
        );
    }
}
