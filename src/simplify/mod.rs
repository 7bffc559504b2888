//! Easy-Korean Module
//!
//! Rewrites complex Korean into simpler sentences through a hosted chat
//! completion model, then romanizes the rewrite with [`RevisedRomanizer`].

mod client;

pub use client::{OpenAiSimplifier, EASY_KOREAN_PROMPT};

use crate::romanize::RevisedRomanizer;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors from the language model call
#[derive(Debug, Error)]
pub enum SimplifyError {
    #[error("Language model request failed: {0}")]
    Http(String),

    #[error("Language model request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Language model rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Language model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse language model response: {0}")]
    Parse(String),

    #[error("Language model returned no completion")]
    EmptyCompletion,
}

pub type Result<T> = std::result::Result<T, SimplifyError>;

/// Single-shot rewrite of Korean text into easy Korean
#[async_trait]
pub trait TextSimplifier: Send + Sync {
    async fn simplify(&self, text: &str) -> Result<String>;
}

/// Outcome of a simplification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Simplified {
    pub original: String,
    pub translated: String,
    pub romanized: String,
}

#[derive(Clone)]
pub struct SimplificationService {
    simplifier: Arc<dyn TextSimplifier>,
    romanizer: RevisedRomanizer,
}

impl SimplificationService {
    pub fn new(simplifier: Arc<dyn TextSimplifier>) -> Self {
        Self {
            simplifier,
            romanizer: RevisedRomanizer::new(),
        }
    }

    pub async fn simplify(&self, text: &str) -> Result<Simplified> {
        let translated = self.simplifier.simplify(text).await?.trim().to_string();
        if translated.is_empty() {
            return Err(SimplifyError::EmptyCompletion);
        }
        let romanized = self.romanizer.romanize(&translated);

        Ok(Simplified {
            original: text.to_string(),
            translated,
            romanized,
        })
    }
}
