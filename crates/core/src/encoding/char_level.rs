//! Character and grapheme splitting.
//!
//! Both splitters return byte ranges into the input instead of owned
//! strings, so segmenting a word never copies its text until a piece is
//! rendered.

use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Byte ranges of every Unicode scalar value in `word`.
pub fn char_spans(word: &str) -> Vec<Range<usize>> {
    word.char_indices()
        .map(|(start, ch)| start..start + ch.len_utf8())
        .collect()
}

/// Byte ranges of every extended grapheme cluster in `word`.
pub fn grapheme_spans(word: &str) -> Vec<Range<usize>> {
    word.grapheme_indices(true)
        .map(|(start, g)| start..start + g.len())
        .collect()
}
