//! Server startup: remote clients, artifact store, sweeper, listener.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::romanize::RomanizationPipeline;
use crate::server::{self, AppState};
use crate::simplify::{OpenAiSimplifier, SimplificationService};
use crate::speech::{spawn_retention_sweeper, ArtifactStore, OpenAiSpeech, SpeechService};

/// Start the HTTP server and block until shutdown
pub(crate) async fn cmd_serve(
    config: &Config,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    // No key, no traffic
    let api_key = config.require_api_key()?.to_string();
    let api_base = config.openai_base_url();

    let speech_client = OpenAiSpeech::new(
        api_key.clone(),
        api_base,
        config.speech.voice.clone(),
        config.speech.model.clone(),
        config.speech.timeout(),
    )
    .context("Failed to build TTS client")?;

    let chat_client = OpenAiSimplifier::new(
        api_key,
        api_base,
        config.chat_model(),
        config.simplify.max_tokens,
        config.simplify.temperature,
        config.simplify.timeout(),
    )
    .context("Failed to build chat client")?;

    let store = ArtifactStore::new(&config.speech.audio_dir);
    store
        .ensure_dir()
        .await
        .with_context(|| format!("Failed to create audio directory: {:?}", store.dir()))?;

    let base_url = config.public_base_url();
    let state = AppState::new(
        RomanizationPipeline::korean(config.romanization.policy),
        SpeechService::new(Arc::new(speech_client), store.clone(), base_url.clone()),
        SimplificationService::new(Arc::new(chat_client)),
        config.speech.delivery,
    );

    let sweeper = spawn_retention_sweeper(
        store,
        config.speech.sweep_interval(),
        config.speech.retention(),
    );

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        policy = %config.romanization.policy,
        delivery = ?config.speech.delivery,
        audio_dir = %config.speech.audio_dir.display(),
        "Artifact links use base URL {}",
        base_url
    );

    let result = server::serve(listener, state, server::shutdown_signal()).await;
    sweeper.abort();

    result.context("HTTP server error")
}
