//! malsori - Korean pronunciation, romanization and speech service
//!
//! An HTTP backend for Korean learners. It turns written Korean into its
//! spoken form and romanizes it, synthesizes speech, and rewrites difficult
//! sentences into easy Korean.
//!
//! ## Features
//!
//! - **Pronunciation rules:** liaison, nasalization, tensification and more, applied to Hangul syllables
//! - **Romanization:** per-syllable (`an-nyeong ha-se-yo`) or whole-string output
//! - **Speech:** OpenAI TTS, stored as uniquely named mp3 files with age-based cleanup
//! - **Easy Korean:** single-shot chat completion plus Revised Romanization
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the server (needs OPENAI_API_KEY)
//! malsori serve --port 8000
//!
//! # Romanize locally, no key required
//! malsori romanize "국물이 맛있어요"
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod hangul;
pub mod logging;
pub mod romanize;
pub mod server;
pub mod simplify;
pub mod speech;

// Re-export commonly used types
pub use error::{ApiError, ErrorCode};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
