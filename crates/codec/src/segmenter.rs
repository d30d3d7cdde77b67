//! Word segmentation by replaying ranked merge rules.
//!
//! A word starts as its base units (the last one word-final) and the
//! adjacent pair with the lowest-ranked rule is merged until no adjacent
//! pair has a rule. All non-overlapping occurrences of the chosen pair are
//! merged left to right in one step, exactly as the learner did when it
//! created that rule.
//!
//! Pieces are tracked as byte ranges into the input word, so the result
//! borrows from the word and unknown base units need no symbol ID: they
//! simply never take part in a merge.

use std::ops::Range;
use std::sync::Arc;
use subbpe_core::{BpeModel, Pair, SymbolId};

#[derive(Debug, Clone)]
struct Piece {
    span: Range<usize>,
    /// `None` for base units never seen in training
    id: Option<SymbolId>,
}

/// Applies a learned rule table to single words.
#[derive(Debug, Clone)]
pub struct Segmenter {
    model: Arc<BpeModel>,
}

impl Segmenter {
    /// Create a segmenter over a shared rule table.
    pub fn new(model: Arc<BpeModel>) -> Self {
        Self { model }
    }

    /// The rule table.
    pub fn model(&self) -> &BpeModel {
        &self.model
    }

    /// Split a word into its subword pieces.
    ///
    /// An empty word yields no pieces.
    pub fn segment<'a>(&self, word: &'a str) -> Vec<&'a str> {
        self.run(word, None)
    }

    /// Like [`Segmenter::segment`], also returning the rank of every rule
    /// applied, in application order.
    pub fn segment_traced<'a>(&self, word: &'a str) -> (Vec<&'a str>, Vec<u32>) {
        let mut trace = Vec::new();
        let pieces = self.run(word, Some(&mut trace));
        (pieces, trace)
    }

    fn run<'a>(&self, word: &'a str, mut trace: Option<&mut Vec<u32>>) -> Vec<&'a str> {
        let spans = self.model.base_unit().spans(word);
        if spans.is_empty() {
            return Vec::new();
        }

        let vocab = self.model.vocab();
        let last = spans.len() - 1;
        let mut pieces: Vec<Piece> = spans
            .into_iter()
            .enumerate()
            .map(|(i, span)| Piece {
                id: vocab.lookup(&word[span.clone()], i == last),
                span,
            })
            .collect();

        while pieces.len() > 1 {
            let (rank, pair, merged) = match self.best_merge(&pieces) {
                Some(best) => best,
                None => break,
            };
            if let Some(trace) = trace.as_mut() {
                trace.push(rank);
            }
            pieces = merge_pieces(pieces, pair, merged);
        }

        pieces.into_iter().map(|p| &word[p.span]).collect()
    }

    /// The applicable rule with the lowest rank, if any.
    fn best_merge(&self, pieces: &[Piece]) -> Option<(u32, Pair, SymbolId)> {
        let merges = self.model.merges();

        pieces
            .windows(2)
            .filter_map(|w| {
                let pair = (w[0].id?, w[1].id?);
                merges.get(pair).map(|(rank, merged)| (rank, pair, merged))
            })
            .min_by_key(|&(rank, _, _)| rank)
    }
}

/// Merge every non-overlapping occurrence of `pair`, left to right.
fn merge_pieces(pieces: Vec<Piece>, pair: Pair, merged: SymbolId) -> Vec<Piece> {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    let mut iter = pieces.into_iter().peekable();

    while let Some(piece) = iter.next() {
        let joins = piece.id == Some(pair.0)
            && iter.peek().map_or(false, |next| next.id == Some(pair.1));

        if joins {
            if let Some(next) = iter.next() {
                out.push(Piece {
                    span: piece.span.start..next.span.end,
                    id: Some(merged),
                });
                continue;
            }
        }
        out.push(piece);
    }

    out
}

/// Render pieces with the continuation marker on every piece but the last.
pub fn render_pieces<S: AsRef<str>>(pieces: &[S], separator: &str) -> Vec<String> {
    let last = pieces.len().saturating_sub(1);
    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let piece = piece.as_ref();
            if i < last {
                let mut token = String::with_capacity(piece.len() + separator.len());
                token.push_str(piece);
                token.push_str(separator);
                token
            } else {
                piece.to_string()
            }
        })
        .collect()
}
