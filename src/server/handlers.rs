//! Route handlers

use super::types::{
    EchoResponse, RomanizeResponse, RootResponse, SpeakResponse, TextForm, TranslateRequest,
    TranslateResponse,
};
use super::AppState;
use crate::config::SpeechDelivery;
use crate::error::ApiError;
use crate::speech::{ArtifactInfo, AUDIO_MEDIA_TYPE};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};

pub const ROOT_MESSAGE: &str = "Korean pronunciation service is running";

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// POST /romanize
pub async fn romanize(
    State(state): State<AppState>,
    Form(form): Form<TextForm>,
) -> Result<Json<RomanizeResponse>, ApiError> {
    let result = state.pipeline.run(&form.text)?;

    Ok(Json(RomanizeResponse {
        input: form.text,
        pronunciation: result.pronunciation,
        romanized: result.romanized,
        policy: state.pipeline.policy().to_string(),
    }))
}

/// POST /speak
pub async fn speak(
    State(state): State<AppState>,
    Form(form): Form<TextForm>,
) -> Result<Response, ApiError> {
    let handle = state.speech.synthesize(&form.text).await?;

    match state.delivery {
        SpeechDelivery::Url => Ok(Json(SpeakResponse {
            tts_url: state.speech.artifact_url(&handle),
        })
        .into_response()),
        SpeechDelivery::Stream => {
            let bytes = state.speech.store().read(&handle.filename).await?;
            Ok(audio_response(bytes))
        }
    }
}

/// GET /tts/{filename}
pub async fn get_tts(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.speech.store().read(&filename).await?;
    Ok(audio_response(bytes))
}

/// GET /check_tts_file/{filename}
pub async fn check_tts_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Json<ArtifactInfo> {
    Json(state.speech.store().info(&filename).await)
}

/// POST /translate-to-easy-korean
pub async fn translate_to_easy_korean(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::InvalidInput("text must not be empty".to_string()));
    }

    let simplified = state.simplifier.simplify(&request.text).await?;

    Ok(Json(TranslateResponse {
        original_text: simplified.original,
        translated_text: simplified.translated,
        romanized_pronunciation: simplified.romanized,
    }))
}

/// POST /echo
pub async fn echo(Form(form): Form<TextForm>) -> Json<EchoResponse> {
    Json(EchoResponse { echo: form.text })
}

fn audio_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, AUDIO_MEDIA_TYPE)], bytes).into_response()
}
