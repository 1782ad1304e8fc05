//! 内容修正与校验
//!
//! 模型输出的结构并不可靠：字段类型可能错误、层级可能缺失。
//! `coerce_module_content` 先把任意 JSON 修正为 `ModuleContent`，
//! 再由各 `validate_*` 函数按需做不同严格程度的校验。

use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::models::{Difficulty, ModuleContent, Question, QuestionSet};

/// 将任意 JSON 修正为模块内容结构
///
/// - 存在但不是字符串的 `content_*` 视为空字符串
/// - 缺失的 `questions.<level>` 补为空集合
/// - 非数组的 `mcq` / `short` 视为空
/// - 非对象的题目条目被丢弃
pub fn coerce_module_content(value: &Value) -> ModuleContent {
    let mut content = ModuleContent::default();

    for difficulty in Difficulty::ALL {
        if let Some(field) = value.get(difficulty.content_key()) {
            let text = field.as_str().unwrap_or_default().to_string();
            content.set_content(difficulty, Some(text));
        }

        let set = value
            .get("questions")
            .and_then(|q| q.get(difficulty.as_str()))
            .filter(|level| is_truthy(level))
            .map(|level| QuestionSet {
                mcq: coerce_questions(level.get("mcq")),
                short: coerce_questions(level.get("short")),
            })
            .unwrap_or_default();
        content.questions.set(difficulty, Some(set));
    }

    content
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_questions(value: Option<&Value>) -> Vec<Question> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(coerce_question).collect())
        .unwrap_or_default()
}

fn coerce_question(value: &Value) -> Option<Question> {
    let obj = value.as_object()?;

    let options = obj.get("options").and_then(Value::as_array).map(|opts| {
        opts.iter()
            .filter(|o| !o.is_null())
            .map(stringify)
            .collect::<Vec<_>>()
    });

    Some(Question {
        question: obj.get("question").map(stringify).unwrap_or_default(),
        options,
        answer: obj.get("answer").map(stringify).unwrap_or_default(),
        explanation: obj.get("explanation").map(stringify).unwrap_or_default(),
    })
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 校验模型返回的内容：出现的 `content_*` 字段不能为空
pub fn validate_module_content(content: &ModuleContent) -> Result<()> {
    for difficulty in Difficulty::ALL {
        if let Some(text) = content.content(difficulty) {
            if text.is_empty() {
                return Err(EngineError::Validation(format!(
                    "Invalid {} in AI response",
                    difficulty.content_key()
                )));
            }
        }
    }
    Ok(())
}

/// 校验单个题目
pub fn validate_question(question: &Question, context: &str) -> Result<()> {
    if question.question.is_empty() {
        return Err(EngineError::Validation(format!(
            "Invalid question text in {}",
            context
        )));
    }

    if let Some(options) = &question.options {
        if options.len() < 2 {
            return Err(EngineError::Validation(format!(
                "Invalid options in {} - must have at least 2 options",
                context
            )));
        }
    }

    if question.answer.is_empty() {
        return Err(EngineError::Validation(format!(
            "Invalid answer in {}",
            context
        )));
    }

    if question.explanation.is_empty() {
        return Err(EngineError::Validation(format!(
            "Invalid explanation in {}",
            context
        )));
    }

    if question.explanation.trim().chars().count() < 5 {
        return Err(EngineError::Validation(format!(
            "Explanation in {} is too short",
            context
        )));
    }

    Ok(())
}

/// 校验单个难度的正文与题目
pub fn validate_difficulty_content(
    content: Option<&str>,
    questions: Option<&QuestionSet>,
    difficulty: Difficulty,
) -> Result<()> {
    if let Some(text) = content {
        if text.is_empty() {
            return Err(EngineError::Validation(format!(
                "Invalid content for {} difficulty",
                difficulty
            )));
        }
        if text.trim().chars().count() < 20 {
            return Err(EngineError::Validation(format!(
                "Content for {} difficulty is too short",
                difficulty
            )));
        }
    }

    if let Some(set) = questions {
        for question in &set.mcq {
            validate_question(question, &format!("{} MCQ", difficulty))?;
        }
        for question in &set.short {
            validate_question(question, &format!("{} short answer", difficulty))?;
        }
    }

    Ok(())
}

/// 校验完整模块内容，仅校验出现了正文的难度
pub fn validate_complete_module_content(content: &ModuleContent) -> Result<()> {
    for difficulty in Difficulty::ALL {
        if let Some(text) = content.content(difficulty) {
            validate_difficulty_content(Some(text), content.questions(difficulty), difficulty)?;
        }
    }
    Ok(())
}

/// 合并多个难度的部分结果
///
/// 结果总是包含三个难度；后出现的非空正文与题目覆盖先前的值。
pub fn merge_module_content(parts: &[ModuleContent]) -> ModuleContent {
    let mut merged = ModuleContent::default();
    for difficulty in Difficulty::ALL {
        merged.set_content(difficulty, Some(String::new()));
        merged
            .questions
            .set(difficulty, Some(QuestionSet::default()));
    }

    for part in parts {
        for difficulty in Difficulty::ALL {
            if let Some(text) = part.content(difficulty).filter(|t| !t.is_empty()) {
                merged.set_content(difficulty, Some(text.to_string()));
            }
            if let Some(set) = part.questions(difficulty) {
                merged.questions.set(difficulty, Some(set.clone()));
            }
        }
    }

    merged
}
