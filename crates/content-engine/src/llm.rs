//! LLM 客户端
//!
//! `LlmClient` 抽象一次非流式的文本生成调用，便于在测试中替换。
//! `OllamaClient` 对接 Ollama 的 `/api/generate` 端点。

use std::time::{Duration, Instant};

use async_trait::async_trait;
use learning_shared::config::LlmConfig;
use learning_shared::observability::metrics;
use learning_shared::retry::{RetryPolicy, retry_with_policy};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{EngineError, Result};
use crate::prompt::truncate_chars;

/// 生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    /// 调用来源，用作指标标签
    pub kind: &'static str,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: 0.7,
            kind: "adhoc",
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }
}

/// 生成结果
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GenerateOutput {
    pub response: String,
    pub model: Option<String>,
    pub total_duration: Option<u64>,
    pub eval_duration: Option<u64>,
}

impl GenerateOutput {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Default::default()
        }
    }
}

/// LLM 客户端接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateOutput>;
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OllamaPayload<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

/// Ollama 响应；部分模型把文本放在 `text` 字段
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    eval_duration: Option<u64>,
}

/// Ollama HTTP 客户端
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    api_url: String,
    retry: RetryPolicy,
}

impl OllamaClient {
    /// 按配置创建客户端（超时与重试次数）
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            retry: RetryPolicy::with_max_retries(config.max_retries),
        })
    }

    /// 替换重试策略
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn send_once(&self, request: &GenerateRequest) -> Result<GenerateOutput> {
        let payload = OllamaPayload {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
            },
        };

        let response = self
            .http
            .post(&self.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %truncate_chars(&body, 200), "Ollama API error");
            return Err(EngineError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        // 读取失败属于网络故障；内容无法解码则不重试
        let body = response.bytes().await.map_err(map_transport_error)?;
        let data: OllamaResponse = serde_json::from_slice(&body).inspect_err(|e| {
            warn!(error = %e, body = %truncate_chars(&String::from_utf8_lossy(&body), 200), "Undecodable Ollama response");
        })?;

        let text = data
            .response
            .filter(|r| !r.is_empty())
            .or(data.text)
            .unwrap_or_default();

        Ok(GenerateOutput {
            response: text,
            model: data.model,
            total_duration: data.total_duration,
            eval_duration: data.eval_duration,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> EngineError {
    if e.is_timeout() {
        EngineError::Timeout
    } else {
        EngineError::Transport(e.to_string())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    #[instrument(skip(self, request), fields(model = %request.model, kind = request.kind))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateOutput> {
        let start = Instant::now();
        let this = self;
        let req = &request;

        let result = retry_with_policy(
            &self.retry,
            "ollama_generate",
            EngineError::is_retryable,
            move || this.send_once(req),
        )
        .await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::record_llm_request(
            &request.model,
            request.kind,
            status,
            start.elapsed().as_secs_f64(),
        );

        if let Ok(output) = &result {
            debug!(
                preview = %truncate_chars(&output.response, 200),
                "Model output received"
            );
        }

        result
    }
}
