//! Saving and reloading rule tables.

use proptest::prelude::*;
use std::fs;
use subbpe_codec::{BaseUnit, BpeError, Codec, CodecLoader, CodecSaver};
use subbpe_core::END_OF_WORD;
use subbpe_training::{MergeLearner, WordCounts};
use tempfile::TempDir;

fn trained() -> Codec {
    let corpus = WordCounts::from_lines([
        "the lowest and the newest of the widest rivers",
        "lower rivers run wider than newer streams",
    ]);
    Codec::builder()
        .train(&corpus, &MergeLearner::with_merges(30))
        .unwrap()
        .0
}

const SAMPLE_LINE: &str = "the newest lowest streams run widest";

#[test]
fn merges_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("merges.txt");
    let codec = trained();

    codec.save_merges(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), codec.model().len());

    let reloaded = Codec::load(&path).unwrap();
    assert_eq!(reloaded.model().len(), codec.model().len());
    assert_eq!(reloaded.encode_line(SAMPLE_LINE), codec.encode_line(SAMPLE_LINE));
}

#[test]
fn bundle_keeps_configuration() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("codec.json");
    let base = trained();
    let codec = Codec::builder()
        .separator("##")
        .glossary("[0-9]+")
        .build(base.model().clone())
        .unwrap();

    codec.save(&path).unwrap();
    let reloaded = Codec::load(&path).unwrap();

    assert_eq!(reloaded.separator(), "##");
    assert_eq!(reloaded.config().glossaries, vec!["[0-9]+".to_string()]);
    assert_eq!(reloaded.encode_line("river 2024"), codec.encode_line("river 2024"));
}

#[test]
fn bundle_records_grapheme_unit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codec.json");
    let model = subbpe_codec::BpeModel::from_rendered_pairs(
        BaseUnit::Grapheme,
        [(1, "e\u{301}", "s")],
    )
    .unwrap();

    CodecSaver::new(&model)
        .save_bundle(&path, &Default::default())
        .unwrap();
    let (loaded, config) = CodecLoader::load_bundle(&path).unwrap();

    assert_eq!(config.base_unit, BaseUnit::Grapheme);
    assert_eq!(loaded.base_unit(), BaseUnit::Grapheme);
    assert_eq!(loaded.len(), 1);
}

#[test]
fn corrupt_table_fails_whole_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("merges.txt");
    fs::write(&path, "e s\nes t</w>\nbroken\nl o\n").unwrap();

    match Codec::load(&path) {
        Err(BpeError::RuleTableCorrupt { line, .. }) => assert_eq!(line, 3),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(codec) => panic!("loaded {} rules from a corrupt table", codec.model().len()),
    }
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.txt");

    match Codec::load(&path) {
        Err(BpeError::Io { path: reported, .. }) => assert_eq!(reported, path),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("loaded a missing file"),
    }
}

#[test]
fn explicit_glossary_extends_bundle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codec.json");
    trained().save_bundle(&path).unwrap();

    let codec = Codec::builder().glossary("<[a-z]+>").load(&path).unwrap();
    assert_eq!(codec.encode_word("<tag>"), vec!["<tag>"]);
}

#[test]
fn end_of_word_suffix_in_corpus_is_rejected() {
    let corpus = WordCounts::from_counts([("</w>a", 5), ("</w>b", 5), ("</w>c", 5)]);
    let result = Codec::builder().train(&corpus, &MergeLearner::with_merges(20));
    assert!(matches!(result, Err(BpeError::ReservedSuffix(_))));
}

#[test]
fn suffix_lookalikes_reload_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("merges.txt");
    let corpus = WordCounts::from_counts([("a</w", 4), ("/w>a", 3), ("<</w", 2), ("w>", 2)]);
    let (codec, _) = Codec::builder()
        .train(&corpus, &MergeLearner::with_merges(20))
        .unwrap();

    codec.save_merges(&path).unwrap();
    let reloaded = Codec::load(&path).unwrap();

    assert_eq!(
        reloaded.model().rendered_rules().collect::<Vec<_>>(),
        codec.model().rendered_rules().collect::<Vec<_>>()
    );
    for word in ["a</w", "/w>a", "<</w", "w>"] {
        assert_eq!(reloaded.encode_word(word), codec.encode_word(word));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_learned_table_reloads_verbatim(
        words in prop::collection::vec(("[</w>a]{1,8}", 1u64..6), 1..8),
        merges in 1usize..30,
    ) {
        let corpus = WordCounts::from_counts(words.iter().map(|(w, c)| (w.as_str(), *c)));
        let reserved = words.iter().any(|(w, _)| w.contains(END_OF_WORD));

        match MergeLearner::with_merges(merges).learn(&corpus) {
            Err(BpeError::ReservedSuffix(_)) => prop_assert!(reserved),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
            Ok(outcome) => {
                prop_assert!(!reserved);
                let mut text = Vec::new();
                CodecSaver::new(&outcome.model).write_merges(&mut text).unwrap();
                let reloaded = CodecLoader::read_merges(text.as_slice(), BaseUnit::Char).unwrap();

                prop_assert_eq!(
                    reloaded.rendered_rules().collect::<Vec<_>>(),
                    outcome.model.rendered_rules().collect::<Vec<_>>()
                );
            }
        }
    }
}
