//! HTTP 请求处理器

pub mod ai;
pub mod attempts;
pub mod generation;
pub mod items;
pub mod module_content;
pub mod modules;
pub mod placements;
pub mod profiles;

use uuid::Uuid;

use crate::error::{ApiError, Result};

/// 取出非空的查询参数
pub(crate) fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| ApiError::BadRequest(format!("Invalid {}", field)))
}
