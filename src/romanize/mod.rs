//! Romanization Module
//!
//! Turns Korean text into Latin letters in two stages: a [`Phonemizer`]
//! rewrites the text into its spoken form, then a [`Transliterator`] maps
//! each Hangul syllable to Latin letters. [`RomanizationPipeline`] joins the
//! two under one of two output policies.
//!
//! [`RevisedRomanizer`] is a separate, context-aware romanizer used for the
//! easy-Korean output. It does not share output shape with the pipeline.

mod phonemizer;
mod pipeline;
mod revised;
mod transliterator;

pub use phonemizer::RulePhonemizer;
pub use pipeline::{RomanizationPipeline, RomanizationPolicy, Romanized};
pub use revised::RevisedRomanizer;
pub use transliterator::AcademicTransliterator;

use thiserror::Error;

/// Errors raised by romanization collaborators
#[derive(Debug, Error)]
pub enum RomanizeError {
    #[error("Phonemizer failed: {0}")]
    Phonemizer(String),

    #[error("Transliterator failed: {0}")]
    Transliterator(String),
}

pub type Result<T> = std::result::Result<T, RomanizeError>;

/// Converts written Korean into its pronounced form.
///
/// Implementations are shared across request handlers, hence `Send + Sync`.
/// An implementation that is not safe to call concurrently must serialize
/// access internally.
pub trait Phonemizer: Send + Sync {
    fn pronounce(&self, text: &str) -> Result<String>;
}

/// Maps Hangul to Latin letters. Non-Hangul characters must pass through
/// unchanged.
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, text: &str) -> Result<String>;
}
