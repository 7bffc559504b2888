//! Pronunciation-to-romanization pipeline

use super::{AcademicTransliterator, Phonemizer, Result, RulePhonemizer, Transliterator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Output shape of the pipeline. Exactly one is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RomanizationPolicy {
    /// Words separated by one space, syllables inside a word joined by `-`
    /// (`an-nyeong ha-se-yo`).
    #[default]
    PerSyllable,
    /// The whole pronunciation transliterated in one call, whitespace kept as
    /// is (`annyeong haseyo`).
    WholeString,
}

impl RomanizationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerSyllable => "per_syllable",
            Self::WholeString => "whole_string",
        }
    }
}

impl fmt::Display for RomanizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RomanizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_syllable" | "a" => Ok(Self::PerSyllable),
            "whole_string" | "b" => Ok(Self::WholeString),
            other => Err(format!(
                "unknown romanization policy '{}', expected per_syllable or whole_string",
                other
            )),
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Romanized {
    pub pronunciation: String,
    pub romanized: String,
}

/// Phonemizer + transliterator under a fixed [`RomanizationPolicy`].
///
/// Holds no mutable state; clones share the same collaborators.
#[derive(Clone)]
pub struct RomanizationPipeline {
    phonemizer: Arc<dyn Phonemizer>,
    transliterator: Arc<dyn Transliterator>,
    policy: RomanizationPolicy,
}

impl fmt::Debug for RomanizationPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RomanizationPipeline")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RomanizationPipeline {
    pub fn new(
        phonemizer: Arc<dyn Phonemizer>,
        transliterator: Arc<dyn Transliterator>,
        policy: RomanizationPolicy,
    ) -> Self {
        Self {
            phonemizer,
            transliterator,
            policy,
        }
    }

    /// Pipeline over the bundled rule phonemizer and academic transliterator
    pub fn korean(policy: RomanizationPolicy) -> Self {
        Self::new(
            Arc::new(RulePhonemizer::new()),
            Arc::new(AcademicTransliterator::new()),
            policy,
        )
    }

    pub fn policy(&self) -> RomanizationPolicy {
        self.policy
    }

    /// Pronunciation string for `utterance`, passed to the phonemizer verbatim
    pub fn pronounce(&self, utterance: &str) -> Result<String> {
        self.phonemizer.pronounce(utterance)
    }

    /// Romanized pronunciation of `utterance`
    pub fn romanize(&self, utterance: &str) -> Result<String> {
        Ok(self.run(utterance)?.romanized)
    }

    /// Pronunciation and romanization in one pass
    pub fn run(&self, utterance: &str) -> Result<Romanized> {
        let pronunciation = self.pronounce(utterance)?;
        let romanized = match self.policy {
            RomanizationPolicy::PerSyllable => self.per_syllable(&pronunciation)?,
            RomanizationPolicy::WholeString => self.transliterator.transliterate(&pronunciation)?,
        };

        tracing::debug!(
            policy = %self.policy,
            chars = utterance.chars().count(),
            "romanized utterance"
        );

        Ok(Romanized {
            pronunciation,
            romanized,
        })
    }

    fn per_syllable(&self, pronunciation: &str) -> Result<String> {
        let mut buf = [0u8; 4];
        let mut words = Vec::new();

        for word in pronunciation.split_whitespace() {
            let syllables = word
                .chars()
                .map(|c| self.transliterator.transliterate(c.encode_utf8(&mut buf)))
                .collect::<Result<Vec<_>>>()?;
            words.push(syllables.join("-"));
        }

        Ok(words.join(" "))
    }
}
