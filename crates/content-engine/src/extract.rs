//! 从模型输出中提取 JSON
//!
//! 模型经常在 JSON 前后夹带说明文字、markdown 围栏或尾随逗号。
//! 提取顺序：```json 围栏 → 普通 ``` 围栏 → 最大的平衡花括号片段。

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::prompt::truncate_chars;

/// 错误信息中保留的原文预览长度（字符）
pub const PREVIEW_CHARS: usize = 300;

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```json\s*(.*?)```").expect("valid json fence regex")
});

static BARE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*(.*?)```").expect("valid fence regex"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma regex"));

/// 提取模型输出中的 JSON 对象文本
pub fn extract_json_object(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(EngineError::EmptyResponse);
    }

    if let Some(inner) = fenced_block(raw) {
        return Ok(inner.to_string());
    }

    if let Some((start, end)) = largest_balanced_span(raw, '{', '}') {
        return Ok(raw[start..end].trim().to_string());
    }

    Err(no_json_found(raw))
}

/// 宽松解析：严格解析失败时去掉 `}` / `]` 前的尾随逗号再试一次
pub fn parse_lenient(json: &str) -> Result<Value> {
    match serde_json::from_str(json) {
        Ok(value) => Ok(value),
        Err(_) => {
            let relaxed = TRAILING_COMMA.replace_all(json, "$1");
            Ok(serde_json::from_str(&relaxed)?)
        }
    }
}

/// 提取任意 JSON 值（对象或数组）
///
/// 即席接口要求模型返回数组，这里依次尝试整段文本、围栏内容、
/// 以及最大的平衡对象或数组片段。
pub fn extract_json_value(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::EmptyResponse);
    }

    if let Ok(value) = parse_lenient(trimmed) {
        return Ok(value);
    }

    if let Some(inner) = fenced_block(raw) {
        if let Ok(value) = parse_lenient(inner) {
            return Ok(value);
        }
    }

    let object = largest_balanced_span(raw, '{', '}');
    let array = largest_balanced_span(raw, '[', ']');
    let best = match (object, array) {
        (Some(o), Some(a)) => Some(if a.1 - a.0 > o.1 - o.0 { a } else { o }),
        (o, a) => o.or(a),
    };

    match best {
        Some((start, end)) => parse_lenient(&raw[start..end]),
        None => Err(no_json_found(raw)),
    }
}

/// 优先 ```json 围栏，没有时才看普通围栏；围栏内为空时返回 None
fn fenced_block(raw: &str) -> Option<&str> {
    let caps = JSON_FENCE
        .captures(raw)
        .or_else(|| BARE_FENCE.captures(raw))?;
    caps.get(1)
        .map(|m| m.as_str().trim())
        .filter(|inner| !inner.is_empty())
}

/// 查找最长的顶层平衡片段，返回字节区间 `[start, end)`
///
/// 字符串字面量内的括号与转义字符会被跳过；孤立的右括号直接忽略。
fn largest_balanced_span(raw: &str, open: char, close: char) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut start: Option<usize> = None;
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in raw.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == open {
            if depth == 0 {
                start = Some(i);
            }
            depth += 1;
        } else if ch == close && depth > 0 {
            depth -= 1;
            if depth == 0 {
                if let Some(s) = start.take() {
                    let candidate = (s, i + ch.len_utf8());
                    if best.is_none_or(|(bs, be)| candidate.1 - candidate.0 > be - bs) {
                        best = Some(candidate);
                    }
                }
            }
        }
    }

    best
}

fn no_json_found(raw: &str) -> EngineError {
    EngineError::NoJsonFound {
        preview: truncate_chars(raw, PREVIEW_CHARS).to_string(),
    }
}
