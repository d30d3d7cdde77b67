//! Pre-segmentation of words.
//!
//! Applied to each whitespace-delimited word before the merge rules run.

pub mod glossary;

pub use glossary::{Glossary, Span};
