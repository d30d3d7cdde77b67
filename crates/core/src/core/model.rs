//! The learned rule table: vocabulary plus ranked merge rules.
//!
//! A `BpeModel` is built either by the learner, one [`BpeModel::add_rule`]
//! per iteration, or from persisted rendered pairs with
//! [`BpeModel::from_rendered_pairs`]. Both paths intern symbols the same
//! way, so a reloaded table replays exactly like the one that was learned.

use super::merges::{MergeRules, Pair};
use super::symbol::{Symbol, SymbolId};
use super::vocab::Vocabulary;
use crate::encoding::BaseUnit;
use crate::error::{BpeError, Result};
use compact_str::CompactString;

/// Vocabulary and merge rules learned together.
#[derive(Debug, Clone, Default)]
pub struct BpeModel {
    vocab: Vocabulary,
    merges: MergeRules,
    base_unit: BaseUnit,
}

impl BpeModel {
    /// Create an empty model over the given base unit.
    pub fn new(base_unit: BaseUnit) -> Self {
        Self {
            vocab: Vocabulary::new(),
            merges: MergeRules::new(),
            base_unit,
        }
    }

    /// Create a model around an existing vocabulary (typically holding the
    /// base units of a corpus) with no rules yet.
    pub fn with_vocab(vocab: Vocabulary, base_unit: BaseUnit) -> Self {
        Self {
            vocab,
            merges: MergeRules::new(),
            base_unit,
        }
    }

    /// Rebuild a model from rendered pairs in rank order.
    ///
    /// Each item is `(line, left, right)` where `line` is the 1-based source
    /// line used in error reports. Any malformed entry fails the whole load.
    pub fn from_rendered_pairs<'a, I>(base_unit: BaseUnit, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, &'a str, &'a str)>,
    {
        let mut model = Self::new(base_unit);

        for (line, left, right) in pairs {
            let left_sym = Symbol::parse_rendered(left)
                .ok_or_else(|| BpeError::corrupt(line, format!("empty symbol '{}'", left)))?;
            let right_sym = Symbol::parse_rendered(right)
                .ok_or_else(|| BpeError::corrupt(line, format!("empty symbol '{}'", right)))?;

            if left_sym.is_final() {
                return Err(BpeError::corrupt(
                    line,
                    format!("left symbol '{}' is word-final", left),
                ));
            }

            let left_id = model.resolve(line, left_sym)?;
            let right_id = model.resolve(line, right_sym)?;

            model.add_rule((left_id, right_id)).map_err(|e| match e {
                BpeError::DuplicateRule(_) => BpeError::corrupt(
                    line,
                    format!("duplicate pair '{} {}' reuses an earlier rank", left, right),
                ),
                other => other,
            })?;
        }

        Ok(model)
    }

    /// Resolve a symbol named by a persisted rule.
    ///
    /// Unknown single-unit symbols are base units; an unknown compound can
    /// only mean its creating rule is missing or comes later.
    fn resolve(&mut self, line: usize, symbol: Symbol) -> Result<SymbolId> {
        if let Some(id) = self.vocab.get_id(&symbol) {
            return Ok(id);
        }
        if self.base_unit.count(symbol.text()) == 1 {
            return self.vocab.add_base(symbol);
        }
        Err(BpeError::corrupt(
            line,
            format!("symbol '{}' is not produced by an earlier rule", symbol),
        ))
    }

    /// Append a rule merging `pair` at the next rank.
    ///
    /// Returns `(rank, merged_id)`.
    pub fn add_rule(&mut self, pair: Pair) -> Result<(u32, SymbolId)> {
        if self.merges.get(pair).is_some() {
            return Err(BpeError::DuplicateRule(self.describe(pair)));
        }

        let merged = {
            let left = self.symbol(pair.0)?;
            let right = self.symbol(pair.1)?;
            left.concat(right)
        };
        let rank = self.merges.len() as u32;
        let merged_id = self.vocab.add_merged(merged, rank)?;
        self.merges.push(pair, merged_id)?;

        Ok((rank, merged_id))
    }

    fn symbol(&self, id: SymbolId) -> Result<&Symbol> {
        self.vocab
            .symbol(id)
            .ok_or_else(|| BpeError::UnknownSymbol(format!("#{}", id)))
    }

    fn describe(&self, pair: Pair) -> String {
        match self.render_pair(pair) {
            Some((left, right)) => format!("{} {}", left, right),
            None => format!("({}, {})", pair.0, pair.1),
        }
    }

    /// Rendered text of a pair's members.
    pub fn render_pair(&self, pair: Pair) -> Option<(CompactString, CompactString)> {
        Some((self.vocab.render(pair.0)?, self.vocab.render(pair.1)?))
    }

    /// Rendered pairs in rank order, the persisted form of the table.
    pub fn rendered_rules(&self) -> impl Iterator<Item = (CompactString, CompactString)> + '_ {
        self.merges
            .iter()
            .filter_map(move |rule| self.render_pair(rule.pair))
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Mutable vocabulary, for registering base units before learning.
    pub fn vocab_mut(&mut self) -> &mut Vocabulary {
        &mut self.vocab
    }

    /// The ranked merge rules.
    pub fn merges(&self) -> &MergeRules {
        &self.merges
    }

    /// The base unit symbols were split into.
    pub fn base_unit(&self) -> BaseUnit {
        self.base_unit
    }

    /// Number of merge rules.
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Whether the model has no merge rules.
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }
}
