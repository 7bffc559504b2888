//! Text-to-speech client and the synthesize-then-store service.

use super::store::{ArtifactHandle, ArtifactStore};
use super::{Result, SpeechError};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote speech synthesis: text in, encoded audio out
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// OpenAI `/audio/speech` client producing mp3
#[derive(Clone)]
pub struct OpenAiSpeech {
    client: Client,
    api_key: String,
    url: String,
    voice: String,
    model: String,
}

impl OpenAiSpeech {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`
    pub fn new(
        api_key: String,
        base_url: &str,
        voice: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()?;

        Ok(Self {
            client,
            api_key,
            url: format!("{}/audio/speech", base_url.trim_end_matches('/')),
            voice,
            model,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
            "response_format": "mp3",
        });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let audio_bytes = response.bytes().await?.to_vec();

        tracing::info!(
            "OpenAI TTS: generated {} bytes of audio (voice={}, model={})",
            audio_bytes.len(),
            self.voice,
            self.model,
        );

        Ok(audio_bytes)
    }
}

/// Synthesizes speech and persists it as a uniquely named artifact
#[derive(Clone)]
pub struct SpeechService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: ArtifactStore,
    base_url: String,
}

impl SpeechService {
    /// `base_url` is the public root used to build artifact links
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: ArtifactStore,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            synthesizer,
            store,
            base_url: base_url.into(),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Call the TTS provider and store the audio under a fresh UUID name
    pub async fn synthesize(&self, text: &str) -> Result<ArtifactHandle> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let audio = self.synthesizer.synthesize(text).await?;
        let handle = self.store.save(&audio).await?;

        tracing::info!(
            "Stored TTS artifact {} ({} bytes, {} chars of text)",
            handle.filename,
            audio.len(),
            text.chars().count()
        );

        Ok(handle)
    }

    /// Absolute retrieval URL for a stored artifact
    pub fn artifact_url(&self, handle: &ArtifactHandle) -> String {
        format!(
            "{}/tts/{}",
            self.base_url.trim_end_matches('/'),
            handle.filename
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::parse_artifact_name;
    use tempfile::TempDir;

    fn client(url: &str) -> OpenAiSpeech {
        OpenAiSpeech::new(
            "test-openai-key".to_string(),
            url,
            "alloy".to_string(),
            "gpt-4o-mini-tts".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_tts_success() {
        let fake_audio = vec![0xFFu8; 256];
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .match_header("Authorization", "Bearer test-openai-key")
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(fake_audio.clone())
            .create_async()
            .await;

        let result = client(&server.url()).synthesize("안녕하세요").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), fake_audio);
    }

    #[tokio::test]
    async fn test_tts_sends_correct_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model":"gpt-4o-mini-tts","voice":"alloy","input":"안녕","response_format":"mp3"}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_body(vec![0u8; 10])
            .create_async()
            .await;

        let _ = client(&server.url()).synthesize("안녕").await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_tts_api_error_returns_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .with_status(429)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .create_async()
            .await;

        let result = client(&server.url()).synthesize("안녕").await;

        mock.assert_async().await;
        match result {
            Err(SpeechError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert!(message.contains("Rate limit"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tts_trailing_slash_base_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .with_status(200)
            .with_body(vec![1u8; 4])
            .create_async()
            .await;

        let result = client(&format!("{}/", server.url())).synthesize("네").await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    /// Accepts connections and never answers them
    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_tts_times_out_on_silent_server() {
        let url = silent_server().await;
        let speech = OpenAiSpeech::new(
            "test-openai-key".to_string(),
            &url,
            "alloy".to_string(),
            "gpt-4o-mini-tts".to_string(),
            Duration::from_millis(300),
        )
        .unwrap();

        let started = std::time::Instant::now();
        let result = speech.synthesize("안녕").await;
        let elapsed = started.elapsed();

        match result {
            Err(SpeechError::Http(e)) => assert!(e.is_timeout(), "not a timeout: {e}"),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
    }

    struct FixedAudio;

    #[async_trait]
    impl SpeechSynthesizer for FixedAudio {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
            Ok(b"ID3fake".to_vec())
        }
    }

    #[tokio::test]
    async fn test_service_stores_artifact_and_builds_url() {
        let dir = TempDir::new().unwrap();
        let service = SpeechService::new(
            Arc::new(FixedAudio),
            ArtifactStore::new(dir.path()),
            "https://speak.example.com/",
        );

        let handle = service.synthesize("안녕").await.unwrap();

        assert_eq!(parse_artifact_name(&handle.filename), Some(handle.id));
        assert_eq!(std::fs::read(&handle.path).unwrap(), b"ID3fake");
        assert_eq!(
            service.artifact_url(&handle),
            format!("https://speak.example.com/tts/{}", handle.filename)
        );
    }

    #[tokio::test]
    async fn test_service_same_text_twice_gives_distinct_artifacts() {
        let dir = TempDir::new().unwrap();
        let service = SpeechService::new(
            Arc::new(FixedAudio),
            ArtifactStore::new(dir.path()),
            "http://localhost:8000",
        );

        let first = service.synthesize("같은 문장").await.unwrap();
        let second = service.synthesize("같은 문장").await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(first.path.exists());
        assert!(second.path.exists());
    }

    #[tokio::test]
    async fn test_service_rejects_empty_text() {
        let dir = TempDir::new().unwrap();
        let service = SpeechService::new(
            Arc::new(FixedAudio),
            ArtifactStore::new(dir.path()),
            "http://localhost:8000",
        );

        let result = service.synthesize("   ").await;
        assert!(matches!(result, Err(SpeechError::EmptyText)));
    }
}
