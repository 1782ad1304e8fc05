//! HTTP 层错误类型
//!
//! 统一的错误响应格式：`{"error": "...", "code": "..."}`。

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use content_engine::EngineError;
use learning_shared::error::SharedError;
use serde_json::json;

/// 系统级错误对外统一返回的提示
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 缺少必填参数
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// 模型输出无法解析为 JSON
    #[error("Error parsing AI response")]
    AiResponseParse(String),

    /// 模型调用或内容生成失败，错误信息对调用方可见
    #[error("{0}")]
    Generation(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AiResponseParse(_)
            | Self::Generation(_)
            | Self::Database(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AiResponseParse(_) => "AI_PARSE_ERROR",
            Self::Generation(_) => "GENERATION_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只记录日志，不向调用方暴露细节
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                INTERNAL_MESSAGE.to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                INTERNAL_MESSAGE.to_string()
            }
            Self::AiResponseParse(detail) => {
                tracing::warn!(detail = %detail, "Error parsing AI response");
                self.to_string()
            }
            Self::Generation(e) => {
                tracing::warn!(error = %e, "AI generation failed");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "error": message,
            "code": self.error_code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 请求体缺失、格式错误或字段不匹配
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON 处理错误: {}", err))
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => Self::Validation(msg),
            e @ EngineError::UnknownDifficulty(_) => Self::Validation(e.to_string()),
            e @ (EngineError::EmptyResponse
            | EngineError::NoJsonFound { .. }
            | EngineError::Json(_)) => Self::AiResponseParse(e.to_string()),
            other => Self::Generation(other.to_string()),
        }
    }
}

impl From<SharedError> for ApiError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::Database(e) => Self::Database(e),
            other => Self::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
