//! 内容引擎领域模型
//!
//! 难度、生成状态、题目与分级内容的数据结构。
//! 序列化格式与模型输出的 JSON 约定保持一致（snake_case）。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// 难度级别
///
/// 旧数据中使用 `hard` 表示最高难度，解析时统一归一化为 `High`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    #[serde(alias = "hard")]
    High,
}

impl Difficulty {
    /// 按生成顺序排列的全部难度
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// 模型输出中对应的正文字段名
    pub fn content_key(&self) -> &'static str {
        match self {
            Self::Easy => "content_easy",
            Self::Medium => "content_medium",
            Self::High => "content_high",
        }
    }

    /// 查询时需要匹配的数据库取值，`high` 同时匹配旧的 `hard`
    pub fn stored_names(&self) -> Vec<String> {
        match self {
            Self::High => vec!["high".to_string(), "hard".to_string()],
            other => vec![other.as_str().to_string()],
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "high" | "hard" => Ok(Self::High),
            other => Err(EngineError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// 单个难度的生成状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Pending,
    Generating,
    Completed,
    Error,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// 进度百分比
    pub fn progress(&self) -> u8 {
        match self {
            Self::Pending | Self::Error => 0,
            Self::Generating => 50,
            Self::Completed => 100,
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生成模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// easy → medium → high，首个失败即停止
    #[default]
    Serial,
    /// 三个难度并发生成，失败互不影响
    Parallel,
}

impl FromStr for GenerationMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(Self::Serial),
            "parallel" => Ok(Self::Parallel),
            other => Err(EngineError::Validation(format!(
                "Unknown generation mode: {}",
                other
            ))),
        }
    }
}

/// 题目
///
/// 单选题带 `options`，简答题没有。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// 某一难度下的题目集合
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default)]
    pub mcq: Vec<Question>,
    #[serde(default)]
    pub short: Vec<Question>,
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        self.mcq.len() + self.short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mcq.is_empty() && self.short.is_empty()
    }
}

/// 按难度分组的题目
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelQuestions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easy: Option<QuestionSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<QuestionSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<QuestionSet>,
}

impl LevelQuestions {
    pub fn get(&self, difficulty: Difficulty) -> Option<&QuestionSet> {
        match difficulty {
            Difficulty::Easy => self.easy.as_ref(),
            Difficulty::Medium => self.medium.as_ref(),
            Difficulty::High => self.high.as_ref(),
        }
    }

    pub fn set(&mut self, difficulty: Difficulty, questions: Option<QuestionSet>) {
        match difficulty {
            Difficulty::Easy => self.easy = questions,
            Difficulty::Medium => self.medium = questions,
            Difficulty::High => self.high = questions,
        }
    }
}

/// 分级模块内容（模型输出约定）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_easy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_high: Option<String>,
    #[serde(default)]
    pub questions: LevelQuestions,
}

impl ModuleContent {
    pub fn content(&self, difficulty: Difficulty) -> Option<&str> {
        match difficulty {
            Difficulty::Easy => self.content_easy.as_deref(),
            Difficulty::Medium => self.content_medium.as_deref(),
            Difficulty::High => self.content_high.as_deref(),
        }
    }

    pub fn set_content(&mut self, difficulty: Difficulty, content: Option<String>) {
        match difficulty {
            Difficulty::Easy => self.content_easy = content,
            Difficulty::Medium => self.content_medium = content,
            Difficulty::High => self.content_high = content,
        }
    }

    pub fn questions(&self, difficulty: Difficulty) -> Option<&QuestionSet> {
        self.questions.get(difficulty)
    }
}

/// 模块三个难度的状态汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleStatus {
    pub easy: GenerationStatus,
    pub medium: GenerationStatus,
    pub high: GenerationStatus,
}

impl ModuleStatus {
    pub fn get(&self, difficulty: Difficulty) -> GenerationStatus {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::High => self.high,
        }
    }

    pub fn is_complete(&self) -> bool {
        Difficulty::ALL
            .iter()
            .all(|d| self.get(*d) == GenerationStatus::Completed)
    }
}

/// 生成进度事件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub module_id: String,
    pub difficulty: Difficulty,
    pub status: GenerationStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn new(
        module_id: &str,
        difficulty: Difficulty,
        status: GenerationStatus,
        error: Option<String>,
    ) -> Self {
        Self {
            module_id: module_id.to_string(),
            difficulty,
            status,
            progress: status.progress(),
            error,
        }
    }
}
