//! Speech Module
//!
//! Text-to-speech (OpenAI TTS) and the on-disk store that keeps generated
//! audio until the retention sweeper removes it.

mod service;
mod store;

pub use service::{OpenAiSpeech, SpeechService, SpeechSynthesizer};
pub use store::{
    parse_artifact_name, spawn_retention_sweeper, ArtifactHandle, ArtifactInfo, ArtifactStore,
    AUDIO_EXTENSION, AUDIO_MEDIA_TYPE,
};

use thiserror::Error;

/// Errors raised while synthesizing, storing or serving audio
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Nothing to synthesize: text is empty")]
    EmptyText,

    #[error("TTS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TTS provider error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Audio storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio file not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
