//! Behavioural laws of the codec: round-trip, determinism, idempotence
//! and rank ordering.

use proptest::prelude::*;
use std::sync::OnceLock;
use subbpe_codec::{BaseUnit, BpeModel, Codec};
use subbpe_training::{LearnerConfig, MergeLearner, WordCounts};

const TRAINING_TEXT: &[&str] = &[
    "the lowest and the newest of the widest rivers",
    "lower rivers run wider than newer streams",
    "a stream is narrower than the river it feeds",
    "newest lowest widest low lower new newer wide wider",
    "write to help@river or r@@d for the newest maps",
];

fn sample_corpus() -> WordCounts {
    WordCounts::from_counts([("low", 5), ("lower", 2), ("newest", 6), ("widest", 3)])
}

fn learned_codec(merges: usize) -> Codec {
    let corpus = WordCounts::from_lines(TRAINING_TEXT.iter().copied());
    Codec::builder()
        .train(&corpus, &MergeLearner::with_merges(merges))
        .unwrap()
        .0
}

/// Codec shared by the property tests.
fn shared_codec() -> &'static Codec {
    static CODEC: OnceLock<Codec> = OnceLock::new();
    CODEC.get_or_init(|| learned_codec(40))
}

/// Assert that the codec segments every training word exactly as the
/// learner left it after `merges` merges.
fn assert_encoding_matches_learner(corpus: &WordCounts, merges: usize) {
    let (outcome, counter) = MergeLearner::with_merges(merges)
        .learn_with_counter(corpus)
        .unwrap();
    let vocab = outcome.model.vocab();
    let codec = Codec::new(outcome.model.clone());

    for ((word, _), ids) in corpus.sorted().into_iter().zip(counter.words()) {
        let learned: Vec<&str> = ids
            .iter()
            .map(|&id| vocab.symbol(id).unwrap().text())
            .collect();
        assert_eq!(
            codec.segment_word(word),
            learned,
            "'{}' after {} merges",
            word,
            merges
        );
    }
}

fn sample_codec(merges: usize) -> Codec {
    Codec::builder()
        .train(&sample_corpus(), &MergeLearner::with_merges(merges))
        .unwrap()
        .0
}

#[test]
fn two_merges_on_sample_corpus() {
    let codec = sample_codec(2);
    let rules: Vec<_> = codec.model().rendered_rules().collect();
    assert_eq!(
        rules,
        vec![("e".into(), "s".into()), ("es".into(), "t</w>".into())]
    );

    let encoded = codec.encode_line("newest");
    assert_eq!(encoded, "n@@ e@@ w@@ est");
    assert_eq!(codec.decode_line(&encoded).text(), "newest");
}

#[test]
fn unseen_word_round_trips() {
    let codec = sample_codec(2);
    let encoded = codec.encode_line("lowest");
    assert_eq!(encoded, "l@@ o@@ w@@ est");

    let decoded = codec.decode_line(&encoded);
    assert!(decoded.is_clean());
    assert_eq!(decoded.text(), "lowest");
}

#[test]
fn zero_merges_yield_base_symbols() {
    let codec = sample_codec(0);
    assert!(codec.model().is_empty());
    assert_eq!(codec.encode_word("newest"), vec!["n@@", "e@@", "w@@", "e@@", "s@@", "t"]);
    assert_eq!(codec.encode_word("x"), vec!["x"]);
}

#[test]
fn fully_merged_word_is_unchanged() {
    let codec = sample_codec(100);
    // Every training word collapses to a single symbol once merges run out
    for word in ["low", "lower", "newest", "widest"] {
        assert_eq!(codec.encode_word(word), vec![word.to_string()]);
    }
    // No rule applies to unseen units either
    assert_eq!(codec.encode_word("zq"), vec!["z@@", "q"]);
}

#[test]
fn encoding_reproduces_learned_segmentation() {
    let corpus = WordCounts::from_lines(TRAINING_TEXT.iter().copied());
    for merges in [1, 5, 20, 45, 80] {
        assert_encoding_matches_learner(&corpus, merges);
    }
    for merges in 0..8 {
        assert_encoding_matches_learner(&sample_corpus(), merges);
    }
}

#[test]
fn training_words_apply_rules_in_rank_order() {
    let codec = sample_codec(10);
    let segmenter = subbpe_codec::Segmenter::new(std::sync::Arc::new(codec.model().clone()));

    for word in ["low", "lower", "newest", "widest"] {
        let (_, trace) = segmenter.segment_traced(word);
        assert!(!trace.is_empty());
        assert!(
            trace.windows(2).all(|w| w[0] <= w[1]),
            "{} applied ranks {:?}",
            word,
            trace
        );
    }
}

#[test]
fn learning_is_deterministic() {
    let corpus = WordCounts::from_lines(TRAINING_TEXT.iter().copied());
    let learn = || {
        let config = LearnerConfig::builder().num_merges(60).build().unwrap();
        let outcome = MergeLearner::new(config).learn(&corpus).unwrap();
        outcome.model.rendered_rules().collect::<Vec<_>>()
    };
    assert_eq!(learn(), learn());
}

#[test]
fn reloaded_table_replays_identically() {
    let codec = learned_codec(60);
    let pairs: Vec<(String, String)> = codec
        .model()
        .rendered_rules()
        .map(|(l, r)| (l.to_string(), r.to_string()))
        .collect();
    let rebuilt = BpeModel::from_rendered_pairs(
        BaseUnit::Char,
        pairs
            .iter()
            .enumerate()
            .map(|(i, (l, r))| (i + 1, l.as_str(), r.as_str())),
    )
    .unwrap();
    let reloaded = Codec::new(rebuilt);

    for line in TRAINING_TEXT {
        assert_eq!(reloaded.encode_line(line), codec.encode_line(line));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // A word ending in the marker is the one shape that cannot round-trip
    #[test]
    fn prop_round_trip(words in prop::collection::vec("[^\\s]{0,11}[^\\s@]", 0..8)) {
        let codec = shared_codec();
        let line = words.join(" ");
        let decoded = codec.decode_line(&codec.encode_line(&line));

        prop_assert!(decoded.is_clean());
        prop_assert_eq!(decoded.words, words);
    }

    #[test]
    fn prop_encoding_reproduces_learned_segmentation(
        words in prop::collection::vec(("[abc]{1,10}", 1u64..8), 1..10),
        merges in 0usize..40,
    ) {
        let corpus = WordCounts::from_counts(words.iter().map(|(w, c)| (w.as_str(), *c)));
        assert_encoding_matches_learner(&corpus, merges);
    }

    #[test]
    fn prop_marker_inside_word_round_trips(
        head in "[a-z]{0,4}",
        markers in "@{1,4}",
        tail in "[a-z]{1,4}",
    ) {
        let codec = shared_codec();
        let word = format!("{}{}{}", head, markers, tail);
        let decoded = codec.decode_line(&codec.encode_line(&word));

        prop_assert!(decoded.is_clean());
        prop_assert_eq!(decoded.text(), word);
    }

    #[test]
    fn prop_pieces_concatenate_to_word(word in "[a-z]{1,16}") {
        let codec = shared_codec();
        let pieces = codec.segment_word(&word);
        prop_assert_eq!(pieces.concat(), word);
    }

    #[test]
    fn prop_segmentation_is_deterministic(word in "[a-z]{1,16}") {
        let retrained = learned_codec(40);
        prop_assert_eq!(shared_codec().encode_word(&word), retrained.encode_word(&word));
    }

    #[test]
    fn prop_only_last_token_lacks_marker(word in "[a-z]{1,16}") {
        let codec = shared_codec();
        let tokens = codec.encode_word(&word);
        let (last, rest) = tokens.split_last().unwrap();

        prop_assert!(!last.ends_with("@@"));
        prop_assert!(rest.iter().all(|t| t.ends_with("@@")));
    }

    #[test]
    fn prop_parallel_batch_matches_sequential(
        lines in prop::collection::vec("[a-z ]{0,30}", 0..10)
    ) {
        let codec = shared_codec();
        let expected: Vec<String> = lines.iter().map(|l| codec.encode_line(l)).collect();
        prop_assert_eq!(codec.encode_lines_parallel(&lines), expected);
    }
}
