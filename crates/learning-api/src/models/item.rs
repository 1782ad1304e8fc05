//! 题目与作答记录

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use content_engine::{Difficulty, Question};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Short,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::Short => "short",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcq" => Ok(Self::Mcq),
            "short" => Ok(Self::Short),
            other => Err(format!("Unknown question type: {}", other)),
        }
    }
}

/// 题目
///
/// `type` 是自由分组（practice、pretest、posttest 等），`question_type` 区分单选与简答。
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: Uuid,
    pub module_id: Uuid,
    pub level: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub item_type: String,
    pub question_type: String,
    pub question: String,
    pub options: Option<serde_json::Value>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 待插入的题目
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub module_id: Uuid,
    pub level: Difficulty,
    pub item_type: String,
    pub question_type: QuestionType,
    pub question: String,
    pub options: Option<serde_json::Value>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

impl NewItem {
    /// 由生成的题目构建
    pub fn from_question(
        module_id: Uuid,
        level: Difficulty,
        item_type: &str,
        question_type: QuestionType,
        question: &Question,
    ) -> Self {
        Self {
            module_id,
            level,
            item_type: item_type.to_string(),
            question_type,
            question: question.question.clone(),
            options: question
                .options
                .as_ref()
                .map(|opts| serde_json::Value::from(opts.clone())),
            answer: Some(question.answer.clone()),
            explanation: Some(question.explanation.clone()),
        }
    }
}

/// 学生作答记录
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Attempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub selected_answer: Option<String>,
    pub ai_feedback: Option<String>,
    pub is_correct: Option<bool>,
    pub created_at: DateTime<Utc>,
}
