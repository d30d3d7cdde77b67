//! Glossary protection.
//!
//! A glossary is a list of regular expressions naming strings that must
//! never be split. A word fully matched by a pattern is kept whole; other
//! matches are cut out of the word and kept atomic while the text around
//! them is segmented normally.

use regex::Regex;
use subbpe_core::Result;

/// A slice of a word and whether it is protected from segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    /// The text of the span
    pub text: &'a str,
    /// Protected spans are emitted as a single piece
    pub protected: bool,
}

impl<'a> Span<'a> {
    fn open(text: &'a str) -> Self {
        Self {
            text,
            protected: false,
        }
    }

    fn protected(text: &'a str) -> Self {
        Self {
            text,
            protected: true,
        }
    }
}

/// A glossary pattern with an anchored companion for whole-word matches.
#[derive(Debug, Clone)]
struct Pattern {
    find: Regex,
    whole: Regex,
}

impl Pattern {
    fn new(source: &str) -> Result<Self> {
        Ok(Self {
            find: Regex::new(source)?,
            whole: Regex::new(&format!(r"\A(?:{})\z", source))?,
        })
    }
}

/// Compiled glossary patterns, applied in order.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    patterns: Vec<Pattern>,
}

impl Glossary {
    /// Compile a glossary.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether the glossary has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Source text of the patterns.
    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.patterns.iter().map(|p| p.find.as_str())
    }

    /// Split a word into protected and open spans.
    ///
    /// Concatenating the spans always gives back the word.
    pub fn split<'a>(&self, word: &'a str) -> Vec<Span<'a>> {
        if word.is_empty() {
            return Vec::new();
        }
        if self.patterns.iter().any(|p| p.whole.is_match(word)) {
            return vec![Span::protected(word)];
        }

        let mut spans = vec![Span::open(word)];
        for pattern in &self.patterns {
            spans = spans
                .into_iter()
                .flat_map(|span| {
                    if span.protected {
                        vec![span]
                    } else {
                        isolate(&pattern.find, span.text)
                    }
                })
                .collect();
        }
        spans
    }
}

/// Cut the non-empty matches of `re` out of `text`.
fn isolate<'a>(re: &Regex, text: &'a str) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for m in re.find_iter(text).filter(|m| !m.as_str().is_empty()) {
        if m.start() > last {
            spans.push(Span::open(&text[last..m.start()]));
        }
        spans.push(Span::protected(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        spans.push(Span::open(&text[last..]));
    }

    spans
}
