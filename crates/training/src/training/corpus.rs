//! Corpus word counts.
//!
//! The learner consumes a corpus as a map from distinct word to occurrence
//! count. Words arrive already tokenized: a line is split on whitespace and
//! nothing else.

use ahash::AHashMap;
use compact_str::CompactString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use subbpe_core::{BpeError, Result};

/// Distinct words with their occurrence counts.
#[derive(Debug, Clone, Default)]
pub struct WordCounts {
    counts: AHashMap<CompactString, u64>,
}

impl WordCounts {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an explicit word -> count mapping.
    ///
    /// Zero counts are ignored; repeated words accumulate.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut corpus = Self::new();
        for (word, count) in counts {
            corpus.add_word_count(word.as_ref(), count);
        }
        corpus
    }

    /// Build from whitespace-tokenized lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Self::new();
        for line in lines {
            corpus.add_line(line.as_ref());
        }
        corpus
    }

    /// Read whitespace-tokenized lines until end of input.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut corpus = Self::new();
        for line in reader.lines() {
            corpus.add_line(&line?);
        }
        Ok(corpus)
    }

    /// Read a whitespace-tokenized text file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| BpeError::io(path, e))?;
        Self::from_reader(BufReader::new(file)).map_err(|e| BpeError::io(path, e))
    }

    /// Read a dictionary with one `word count` entry per line.
    ///
    /// Blank lines are skipped; anything else that is not exactly a word
    /// followed by an unsigned count is rejected.
    pub fn from_dict_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut corpus = Self::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_num = idx + 1;
            let line = line.map_err(|e| BpeError::io("<dictionary>", e))?;
            let mut fields = line.split_whitespace();

            let (word, count) = match (fields.next(), fields.next(), fields.next()) {
                (None, _, _) => continue,
                (Some(word), Some(count), None) => (word, count),
                _ => {
                    return Err(BpeError::MalformedCorpus {
                        line: line_num,
                        reason: format!("expected 'word count', got '{}'", line),
                    })
                }
            };

            let count: u64 = count.parse().map_err(|_| BpeError::MalformedCorpus {
                line: line_num,
                reason: format!("invalid count '{}'", count),
            })?;
            corpus.add_word_count(word, count);
        }

        Ok(corpus)
    }

    /// Count every whitespace-delimited word of a line once.
    pub fn add_line(&mut self, line: &str) {
        for word in line.split_whitespace() {
            self.add_word(word);
        }
    }

    /// Count one occurrence of a word.
    pub fn add_word(&mut self, word: &str) {
        self.add_word_count(word, 1);
    }

    /// Add `count` occurrences of a word. Counts saturate at `u64::MAX`.
    pub fn add_word_count(&mut self, word: &str, count: u64) {
        if word.is_empty() || count == 0 {
            return;
        }
        let slot = self.counts.entry(CompactString::new(word)).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Occurrence count of a word.
    pub fn get(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the corpus holds no words.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of word occurrences.
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |total, &count| total.saturating_add(count))
    }

    /// Words with counts, sorted by word so iteration is reproducible.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut words: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(word, &count)| (word.as_str(), count))
            .collect();
        words.sort_unstable_by(|a, b| a.0.cmp(b.0));
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines() {
        let corpus = WordCounts::from_lines(["the cat", "the  dog\t", ""]);
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.get("the"), Some(2));
        assert_eq!(corpus.get("dog"), Some(1));
        assert_eq!(corpus.total(), 4);
    }

    #[test]
    fn test_from_counts_accumulates() {
        let corpus = WordCounts::from_counts([("low", 5), ("low", 2), ("never", 0)]);
        assert_eq!(corpus.get("low"), Some(7));
        assert_eq!(corpus.get("never"), None);
    }

    #[test]
    fn test_counts_saturate() {
        let corpus = WordCounts::from_counts([("low", u64::MAX), ("low", 3), ("new", 1)]);
        assert_eq!(corpus.get("low"), Some(u64::MAX));
        assert_eq!(corpus.total(), u64::MAX);
    }

    #[test]
    fn test_sorted_order() {
        let corpus = WordCounts::from_counts([("widest", 3), ("low", 5), ("newest", 6)]);
        let words: Vec<&str> = corpus.sorted().into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["low", "newest", "widest"]);
    }

    #[test]
    fn test_from_reader() {
        let input = "a b\nb c\n";
        let corpus = WordCounts::from_reader(input.as_bytes()).unwrap();
        assert_eq!(corpus.get("b"), Some(2));
    }

    #[test]
    fn test_from_dict_reader() {
        let input = "low 5\n\nnewest 6\n";
        let corpus = WordCounts::from_dict_reader(input.as_bytes()).unwrap();
        assert_eq!(corpus.get("low"), Some(5));
        assert_eq!(corpus.get("newest"), Some(6));
    }

    #[test]
    fn test_from_dict_reader_rejects_bad_lines() {
        let err = WordCounts::from_dict_reader("low 5\nnewest\n".as_bytes()).unwrap_err();
        assert!(matches!(err, BpeError::MalformedCorpus { line: 2, .. }));

        let err = WordCounts::from_dict_reader("low five\n".as_bytes()).unwrap_err();
        assert!(matches!(err, BpeError::MalformedCorpus { line: 1, .. }));
    }
}
