//! Request and response bodies

use serde::{Deserialize, Serialize};

/// Form body shared by `/romanize`, `/speak` and `/echo`
#[derive(Debug, Deserialize)]
pub struct TextForm {
    pub text: String,
}

/// JSON body of `/translate-to-easy-korean`
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RomanizeResponse {
    pub input: String,
    pub pronunciation: String,
    pub romanized: String,
    pub policy: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakResponse {
    pub tts_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub original_text: String,
    pub translated_text: String,
    pub romanized_pronunciation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EchoResponse {
    pub echo: String,
}
