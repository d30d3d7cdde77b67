//! Reassembly of segmented text.
//!
//! A token ending with the continuation marker is joined to the following
//! token with no space; any other token ends a word. A stream whose last
//! token still carries the marker is recovered by emitting that word with
//! the marker stripped, and the anomaly is reported to the caller.

use compact_str::CompactString;
use log::warn;
use std::fmt;

/// A recoverable problem found while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeAnomaly {
    /// The last token carried the continuation marker
    TrailingMarker {
        /// Index of the token in the input stream
        index: usize,
        /// The token as received
        token: String,
    },
}

impl fmt::Display for DecodeAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeAnomaly::TrailingMarker { index, token } => write!(
                f,
                "token {} '{}' ends the stream with a continuation marker",
                index, token
            ),
        }
    }
}

/// Reconstructed words plus any anomalies met on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Reconstructed words, in order
    pub words: Vec<String>,
    /// Recoverable problems, in stream order
    pub anomalies: Vec<DecodeAnomaly>,
}

impl Decoded {
    /// Words joined with single spaces.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    /// Whether decoding met no anomaly.
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Reverses continuation markers.
#[derive(Debug, Clone)]
pub struct Reassembler {
    separator: CompactString,
}

impl Reassembler {
    /// Create a reassembler for the given continuation marker.
    pub fn new(separator: &str) -> Self {
        Self {
            separator: CompactString::new(separator),
        }
    }

    /// The continuation marker.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Rebuild words from a token stream.
    pub fn decode_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Decoded {
        let mut decoded = Decoded::default();
        let mut current = String::new();
        let mut open = false;

        for token in tokens {
            let token = token.as_ref();
            match token.strip_suffix(self.separator.as_str()) {
                Some(stem) => {
                    current.push_str(stem);
                    open = true;
                }
                None => {
                    current.push_str(token);
                    decoded.words.push(std::mem::take(&mut current));
                    open = false;
                }
            }
        }

        if open {
            let index = tokens.len() - 1;
            let anomaly = DecodeAnomaly::TrailingMarker {
                index,
                token: tokens[index].as_ref().to_string(),
            };
            warn!("{}; emitting it without the marker", anomaly);
            decoded.anomalies.push(anomaly);
            decoded.words.push(current);
        }

        decoded
    }

    /// Rebuild words from a whitespace-separated line of tokens.
    pub fn decode_line(&self, line: &str) -> Decoded {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        self.decode_tokens(&tokens)
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SEPARATOR)
    }
}
