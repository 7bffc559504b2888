//! OpenAI chat-completions client for the easy-Korean rewrite.

use super::{Result, SimplifyError, TextSimplifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed instruction sent as the system message
pub const EASY_KOREAN_PROMPT: &str = "당신은 한국어를 배우는 외국인을 돕는 한국어 선생님입니다. \
사용자가 보낸 어려운 한국어 문장을 초급 학습자도 이해할 수 있는 쉬운 한국어로 바꾸세요. \
뜻은 그대로 유지하고, 짧은 문장과 자주 쓰는 쉬운 단어를 사용하세요. \
설명 없이 바꾼 문장만 출력하세요.";

#[derive(Clone)]
pub struct OpenAiSimplifier {
    client: Client,
    api_key: String,
    url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl OpenAiSimplifier {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`
    pub fn new(
        api_key: String,
        base_url: &str,
        model: String,
        max_tokens: u32,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| SimplifyError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
            max_tokens,
            temperature,
            timeout,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> SimplifyError {
        if err.is_timeout() {
            SimplifyError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            SimplifyError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl TextSimplifier for OpenAiSimplifier {
    async fn simplify(&self, text: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": EASY_KOREAN_PROMPT },
                { "role": "user", "content": text },
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "n": 1,
        });

        tracing::info!(
            "OpenAI chat request: model={}, max_tokens={}, input_chars={}",
            self.model,
            self.max_tokens,
            text.chars().count()
        );

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let raw = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAiError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            tracing::error!("OpenAI chat error ({}): {}", status, message);
            return Err(if status.as_u16() == 429 {
                SimplifyError::RateLimited(message)
            } else {
                SimplifyError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&raw).map_err(|e| SimplifyError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(SimplifyError::EmptyCompletion)?;

        tracing::info!("OpenAI chat response: {} chars", content.chars().count());

        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplifier(url: &str) -> OpenAiSimplifier {
        OpenAiSimplifier::new(
            "test-openai-key".to_string(),
            url,
            "gpt-4o-mini".to_string(),
            300,
            0.3,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_chat_response_parse() {
        let json = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"쉬운 문장"},"finish_reason":"stop"}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("쉬운 문장")
        );
    }

    #[tokio::test]
    async fn test_chat_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("Authorization", "Bearer test-openai-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  밥을 먹어요.  "}}]}"#)
            .create_async()
            .await;

        let result = simplifier(&server.url()).simplify("식사를 하십니다").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "  밥을 먹어요.  ");
    }

    #[tokio::test]
    async fn test_chat_sends_prompt_and_limits() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 300,
                "n": 1,
                "messages": [
                    { "role": "system", "content": EASY_KOREAN_PROMPT },
                    { "role": "user", "content": "식사를 하십니다" },
                ],
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"밥을 먹어요."}}]}"#)
            .create_async()
            .await;

        let _ = simplifier(&server.url()).simplify("식사를 하십니다").await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#)
            .create_async()
            .await;

        let result = simplifier(&server.url()).simplify("문장").await;

        mock.assert_async().await;
        match result {
            Err(SimplifyError::RateLimited(message)) => {
                assert_eq!(message, "You exceeded your current quota")
            }
            other => panic!("expected rate limit error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chat_api_error_keeps_raw_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = simplifier(&server.url())
            .simplify("문장")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_chat_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let result = simplifier(&server.url()).simplify("문장").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SimplifyError::Parse(_))));
    }

    #[tokio::test]
    async fn test_chat_no_choices() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let result = simplifier(&server.url()).simplify("문장").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SimplifyError::EmptyCompletion)));
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
    async fn test_chat_times_out_on_silent_server() {
        let url = silent_server().await;
        let simplifier = OpenAiSimplifier::new(
            "test-openai-key".to_string(),
            &url,
            "gpt-4o-mini".to_string(),
            300,
            0.3,
            Duration::from_millis(300),
        )
        .unwrap();

        let started = std::time::Instant::now();
        let result = simplifier.simplify("문장").await;
        let elapsed = started.elapsed();

        assert!(
            matches!(result, Err(SimplifyError::Timeout { timeout_secs: 0 })),
            "expected timeout, got {:?}",
            result
        );
        assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        // Port 9 (discard) on localhost is not expected to accept connections
        let result = simplifier("http://127.0.0.1:9").simplify("문장").await;
        assert!(matches!(
            result,
            Err(SimplifyError::Http(_)) | Err(SimplifyError::Timeout { .. })
        ));
    }
}
