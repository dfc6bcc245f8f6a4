use crate::config::DeepSeekConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Clone)]
pub struct DeepSeekClient {
    client: Client,
    config: DeepSeekConfig,
}

impl DeepSeekClient {
    pub fn new(config: DeepSeekConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(AppError::ReqwestError)?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// 超时/连接失败时指数退避重试, 其他错误立即返回
    pub async fn chat(&self, prompt: &str) -> AppResult<String> {
        if !self.is_configured() {
            return Err(AppError::ExternalApiError(
                "DeepSeek API key 未配置".to_string(),
            ));
        }

        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.7,
        };

        let mut attempt = 0u32;
        loop {
            match self.send_once(&body).await {
                Ok(answer) => return Ok(answer),
                Err(AppError::ReqwestError(e))
                    if (e.is_timeout() || e.is_connect()) && attempt < self.config.max_retries =>
                {
                    attempt += 1;
                    let backoff = Duration::from_secs(1 << attempt);
                    log::warn!(
                        "DeepSeek request failed ({e}), retry {attempt}/{} after {backoff:?}",
                        self.config.max_retries
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, body: &ChatRequest) -> AppResult<String> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(self.config.read_timeout_secs))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            log::error!("DeepSeek API error {status}: {text}");
            return Err(AppError::ExternalApiError(format!(
                "DeepSeek API 返回 {status}"
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::ExternalApiError("DeepSeek 返回了空回答".to_string()))
    }
}
