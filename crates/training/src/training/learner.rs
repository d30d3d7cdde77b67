//! Merge learner.
//!
//! Learns ranked merge rules from a corpus of word counts by repeatedly
//! merging the most frequent adjacent symbol pair. Ties are broken on the
//! rendered pair text, so the rule sequence is a pure function of the
//! corpus and the configuration.

use super::config::LearnerConfig;
use super::counter::PairCounter;
use super::corpus::WordCounts;
use ahash::AHashMap;
use log::{debug, info};
use std::fmt;
use subbpe_core::{BpeModel, MergeCandidate, Pair, PairPriorityQueue, Result, Vocabulary};

/// Why learning stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// All requested merges were learned
    Completed,
    /// No pair with a positive count remained
    Exhausted,
    /// The best remaining pair fell below the minimum frequency
    BelowMinFrequency,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Completed => f.write_str("all requested merges learned"),
            StopReason::Exhausted => f.write_str("no pairs left to merge"),
            StopReason::BelowMinFrequency => f.write_str("best pair below minimum frequency"),
        }
    }
}

/// Result of a learning run.
#[derive(Debug, Clone)]
pub struct LearnOutcome {
    /// Learned vocabulary and ranked rules
    pub model: BpeModel,
    /// Number of merges that were asked for
    pub requested: usize,
    /// Why the loop ended
    pub stop_reason: StopReason,
}

impl LearnOutcome {
    /// Whether fewer rules than requested were produced.
    ///
    /// This is informational; a short rule table is still a valid result.
    pub fn is_degenerate(&self) -> bool {
        self.model.len() < self.requested
    }
}

/// BPE merge learner.
#[derive(Debug, Clone, Default)]
pub struct MergeLearner {
    config: LearnerConfig,
}

impl MergeLearner {
    /// Create a learner with the given configuration.
    pub fn new(config: LearnerConfig) -> Self {
        Self { config }
    }

    /// Create a learner with default configuration and `num_merges` merges.
    pub fn with_merges(num_merges: usize) -> Self {
        Self::new(LearnerConfig {
            num_merges,
            ..Default::default()
        })
    }

    /// The learner configuration.
    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Learn merge rules from a corpus.
    pub fn learn(&self, corpus: &WordCounts) -> Result<LearnOutcome> {
        self.learn_with_counter(corpus).map(|(outcome, _)| outcome)
    }

    /// Like [`MergeLearner::learn`], also returning the pair counter.
    ///
    /// The counter's words are the final segmentations of the corpus words,
    /// in [`WordCounts::sorted`] order.
    pub fn learn_with_counter(&self, corpus: &WordCounts) -> Result<(LearnOutcome, PairCounter)> {
        self.config.validate()?;

        let unit = self.config.base_unit;
        let mut vocab = Vocabulary::new();
        let mut counter = PairCounter::from_corpus(corpus, &mut vocab, unit)?;
        let mut model = BpeModel::with_vocab(vocab, unit);

        info!(
            "learning up to {} merges from {} distinct words ({} occurrences, {} base symbols)",
            self.config.num_merges,
            counter.word_count(),
            counter.total_word_occurrences(),
            model.vocab().len()
        );

        if self.config.num_merges == 0 {
            let outcome = LearnOutcome {
                model,
                requested: 0,
                stop_reason: StopReason::Completed,
            };
            return Ok((outcome, counter));
        }

        let mut pair_counts = if self.config.parallel {
            counter.count_pairs_parallel()
        } else {
            counter.count_pairs_sequential()
        };
        let mut queue = build_queue(&model, &pair_counts);

        debug!("{} distinct pairs in initial count", pair_counts.len());

        let mut stop_reason = StopReason::Exhausted;

        while model.len() < self.config.num_merges {
            let candidate = match queue.pop() {
                Some(c) => c,
                None => break,
            };

            if candidate.count < self.config.min_frequency {
                stop_reason = StopReason::BelowMinFrequency;
                break;
            }

            let merged = match model.merges().get(candidate.pair) {
                // The pair re-formed after its own rule was applied. Replaying
                // the existing rule keeps training state in step with the
                // segmenter without spending a rank.
                Some((rank, merged)) => {
                    debug!(
                        "re-applying rule {} '{} {}' ({} occurrences)",
                        rank, candidate.key.0, candidate.key.1, candidate.count
                    );
                    merged
                }
                None => {
                    let (rank, merged) = model.add_rule(candidate.pair)?;
                    if self.config.show_progress {
                        info!(
                            "merge {:>6} count {:>8} pair '{} {}' distinct_pairs {:>8}",
                            rank,
                            candidate.count,
                            candidate.key.0,
                            candidate.key.1,
                            pair_counts.len()
                        );
                    } else {
                        debug!(
                            "merge {} '{} {}' ({})",
                            rank, candidate.key.0, candidate.key.1, candidate.count
                        );
                    }
                    merged
                }
            };

            let deltas = counter.merge_pair_in_words(candidate.pair, merged);
            update_pair_counts(&model, &mut pair_counts, &mut queue, deltas);
        }

        if model.len() >= self.config.num_merges {
            stop_reason = StopReason::Completed;
        }

        let outcome = LearnOutcome {
            model,
            requested: self.config.num_merges,
            stop_reason,
        };

        if outcome.is_degenerate() {
            info!(
                "stopped after {} of {} requested merges: {}",
                outcome.model.len(),
                outcome.requested,
                outcome.stop_reason
            );
        } else {
            info!("learned {} merges", outcome.model.len());
        }

        Ok((outcome, counter))
    }
}

/// Build the priority queue from pair counts.
fn build_queue(model: &BpeModel, pair_counts: &AHashMap<Pair, u64>) -> PairPriorityQueue {
    let mut queue = PairPriorityQueue::with_capacity(pair_counts.len());

    for (&pair, &count) in pair_counts {
        if let Some(key) = model.render_pair(pair) {
            queue.push(MergeCandidate::new(pair, count, key));
        }
    }

    queue
}

/// Apply merge deltas to the pair counts and the queue.
fn update_pair_counts(
    model: &BpeModel,
    pair_counts: &mut AHashMap<Pair, u64>,
    queue: &mut PairPriorityQueue,
    deltas: AHashMap<Pair, i128>,
) {
    for (pair, delta) in deltas {
        let current = pair_counts.get(&pair).copied().unwrap_or(0);
        let new_count = (i128::from(current) + delta).clamp(0, i128::from(u64::MAX)) as u64;

        if new_count > 0 {
            pair_counts.insert(pair, new_count);
            if let Some(key) = model.render_pair(pair) {
                queue.push(MergeCandidate::new(pair, new_count, key));
            }
        } else {
            pair_counts.remove(&pair);
            queue.remove(pair);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;
    use subbpe_core::BaseUnit;

    fn rules(outcome: &LearnOutcome) -> Vec<(CompactString, CompactString)> {
        outcome.model.rendered_rules().collect()
    }

    fn sample_corpus() -> WordCounts {
        WordCounts::from_counts([("low", 5), ("lower", 2), ("newest", 6), ("widest", 3)])
    }

    #[test]
    fn test_two_merges_on_sample_corpus() {
        let outcome = MergeLearner::with_merges(2).learn(&sample_corpus()).unwrap();

        // (e, s) and (s, t</w>) both occur 9 times; "e s" sorts first
        assert_eq!(
            rules(&outcome),
            vec![
                ("e".into(), "s".into()),
                ("es".into(), "t</w>".into())
            ]
        );
        assert_eq!(outcome.stop_reason, StopReason::Completed);
        assert!(!outcome.is_degenerate());
    }

    #[test]
    fn test_zero_merges() {
        let outcome = MergeLearner::with_merges(0).learn(&sample_corpus()).unwrap();
        assert!(outcome.model.is_empty());
        assert_eq!(outcome.stop_reason, StopReason::Completed);
        // Base symbols are still registered
        assert!(outcome.model.vocab().lookup("w", false).is_some());
    }

    #[test]
    fn test_exhausts_before_target() {
        let corpus = WordCounts::from_counts([("ab", 1)]);
        let outcome = MergeLearner::with_merges(10).learn(&corpus).unwrap();

        assert_eq!(rules(&outcome), vec![("a".into(), "b</w>".into())]);
        assert_eq!(outcome.stop_reason, StopReason::Exhausted);
        assert!(outcome.is_degenerate());
    }

    #[test]
    fn test_single_symbol_words_yield_no_rules() {
        let corpus = WordCounts::from_counts([("a", 4), ("b", 2)]);
        let outcome = MergeLearner::with_merges(5).learn(&corpus).unwrap();
        assert!(outcome.model.is_empty());
        assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    }

    #[test]
    fn test_min_frequency_stops_learning() {
        let config = LearnerConfig::builder()
            .num_merges(100)
            .min_frequency(7)
            .build()
            .unwrap();
        let outcome = MergeLearner::new(config).learn(&sample_corpus()).unwrap();

        // e+s (9), es+t</w> (9) and l+o (7) qualify; the best after that is 6
        assert_eq!(outcome.stop_reason, StopReason::BelowMinFrequency);
        assert_eq!(outcome.model.len(), 3);
        assert_eq!(rules(&outcome)[2], ("l".into(), "o".into()));
    }

    #[test]
    fn test_overlapping_pair() {
        let corpus = WordCounts::from_counts([("aaa", 1)]);
        let outcome = MergeLearner::with_merges(10).learn(&corpus).unwrap();

        // "a a a</w>" -> "aa a</w>" -> "aaa</w>"
        assert_eq!(
            rules(&outcome),
            vec![
                ("a".into(), "a".into()),
                ("aa".into(), "a</w>".into())
            ]
        );
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let corpus = WordCounts::from_lines([
            "the quick brown fox jumps over the lazy dog",
            "the dog barks and the fox runs",
            "lower lowest newer newest wider widest",
        ]);
        let learn = |parallel| {
            let config = LearnerConfig::builder()
                .num_merges(40)
                .parallel(parallel)
                .build()
                .unwrap();
            rules(&MergeLearner::new(config).learn(&corpus).unwrap())
        };

        assert_eq!(learn(true), learn(false));
    }

    #[test]
    fn test_huge_counts_do_not_wrap() {
        let corpus = WordCounts::from_counts([("ab", u64::MAX), ("cab", u64::MAX)]);
        let outcome = MergeLearner::with_merges(5).learn(&corpus).unwrap();

        assert_eq!(
            rules(&outcome),
            vec![
                ("a".into(), "b</w>".into()),
                ("c".into(), "ab</w>".into())
            ]
        );
        assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    }

    #[test]
    fn test_reserved_suffix_is_an_error() {
        let corpus = WordCounts::from_counts([("</w>a", 5), ("</w>b", 5)]);
        let result = MergeLearner::with_merges(20).learn(&corpus);
        assert!(matches!(result, Err(subbpe_core::BpeError::ReservedSuffix(_))));
    }

    #[test]
    fn test_grapheme_units() {
        let corpus = WordCounts::from_counts([("e\u{301}e\u{301}", 3)]);
        let config = LearnerConfig::builder()
            .num_merges(5)
            .base_unit(BaseUnit::Grapheme)
            .build()
            .unwrap();
        let outcome = MergeLearner::new(config).learn(&corpus).unwrap();

        assert_eq!(
            rules(&outcome),
            vec![("e\u{301}".into(), "e\u{301}</w>".into())]
        );
    }
}
