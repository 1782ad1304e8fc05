//! 内容引擎错误类型

use thiserror::Error;

use crate::models::Difficulty;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Empty AI response")]
    EmptyResponse,

    #[error("Could not extract JSON from AI response. Preview: {preview}")]
    NoJsonFound { preview: String },

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Ollama API error: {status} {body}")]
    Upstream { status: u16, body: String },

    #[error("LLM 请求失败: {0}")]
    Transport(String),

    #[error("LLM 请求超时")]
    Timeout,

    #[error("Invalid JSON response from AI model for {difficulty} content: {reason}")]
    GenerationFailed {
        difficulty: Difficulty,
        reason: String,
    },

    #[error("Some difficulties failed to generate: {}", join_levels(.failed))]
    PartialFailure { failed: Vec<Difficulty> },

    #[error("Unknown difficulty level: {0}")]
    UnknownDifficulty(String),
}

fn join_levels(levels: &[Difficulty]) -> String {
    levels
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl EngineError {
    /// 只有网络层故障与上游 5xx 值得重试
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
