//! AI 服务客户端
//!
//! 与生成式文本服务通信

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::types::*;
use crate::config::TranslatorConfig;
use crate::error::{Result, SignBridgeError};

/// 文本生成接口
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 单次生成，不重试
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

/// AI 服务客户端
pub struct AiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl AiClient {
    /// 创建新的 AI 客户端
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SignBridgeError::config("endpoint", format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.api_key.clone(), config.timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for AiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            prompt: prompt.to_string(),
        };

        debug!("Sending generate request ({} chars)", prompt.len());

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Generate request failed: {}", e);
            SignBridgeError::unavailable(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            warn!("Generate request returned {}", status);
            return Err(SignBridgeError::unavailable(format!("{}: {}", status, error.trim())));
        }

        let body = response
            .bytes()
            .await
            .map_err(SignBridgeError::unavailable)?;
        let result: GenerateResponse = serde_json::from_slice(&body)
            .map_err(|e| SignBridgeError::unavailable(format!("malformed response: {}", e)))?;

        debug!("Received {} chars", result.text.len());

        Ok(result.text)
    }
}
