//! 学生档案与分级结果

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Instructor,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// 学生在模块中的分级，`(user_id, module_id)` 唯一
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Placement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub level: String,
    pub score: Option<i32>,
    pub updated_at: DateTime<Utc>,
}
