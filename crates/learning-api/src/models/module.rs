//! 学习模块与分级正文

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 教师创建的学习模块
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Module {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 模块某一难度的正文，`(module_id, level)` 唯一
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ModuleContentRow {
    pub id: Uuid,
    pub module_id: Uuid,
    pub level: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
