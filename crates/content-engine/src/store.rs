//! 生成内容存储
//!
//! 使用 DashMap 按 `(module_id, difficulty)` 保存生成状态、正文与题目。
//! 仅驻留内存，服务重启后丢失。

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use crate::models::{Difficulty, GenerationStatus, ModuleContent, ModuleStatus, QuestionSet};

/// 单个难度的生成状态
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DifficultyState {
    pub content: Option<String>,
    pub questions: Option<QuestionSet>,
    pub status: GenerationStatus,
    pub error: Option<String>,
}

type Key = (String, Difficulty);

/// 内容存储
#[derive(Clone, Default)]
pub struct ContentStore {
    entries: Arc<DashMap<Key, DifficultyState>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(module_id: &str, difficulty: Difficulty) -> Key {
        (module_id.to_string(), difficulty)
    }

    /// 初始化条目为 pending，已存在时不做修改
    pub fn initialize(&self, module_id: &str, difficulty: Difficulty) {
        self.entries
            .entry(Self::key(module_id, difficulty))
            .or_default();
    }

    /// 更新状态；传入错误信息时记录，否则清除旧错误
    pub fn update_status(
        &self,
        module_id: &str,
        difficulty: Difficulty,
        status: GenerationStatus,
        error: Option<String>,
    ) {
        let mut entry = self
            .entries
            .entry(Self::key(module_id, difficulty))
            .or_default();
        entry.status = status;
        entry.error = error;
        debug!(module_id, %difficulty, %status, "generation status updated");
    }

    /// 更新正文；题目为 None 时保留原有题目
    pub fn update_content(
        &self,
        module_id: &str,
        difficulty: Difficulty,
        content: String,
        questions: Option<QuestionSet>,
    ) {
        let mut entry = self
            .entries
            .entry(Self::key(module_id, difficulty))
            .or_default();
        entry.content = Some(content);
        if questions.is_some() {
            entry.questions = questions;
        }
    }

    pub fn status(&self, module_id: &str, difficulty: Difficulty) -> GenerationStatus {
        self.entries
            .get(&Self::key(module_id, difficulty))
            .map(|e| e.status)
            .unwrap_or_default()
    }

    pub fn error(&self, module_id: &str, difficulty: Difficulty) -> Option<String> {
        self.entries
            .get(&Self::key(module_id, difficulty))
            .and_then(|e| e.error.clone())
    }

    pub fn content(&self, module_id: &str, difficulty: Difficulty) -> Option<String> {
        self.entries
            .get(&Self::key(module_id, difficulty))
            .and_then(|e| e.content.clone())
    }

    pub fn questions(&self, module_id: &str, difficulty: Difficulty) -> Option<QuestionSet> {
        self.entries
            .get(&Self::key(module_id, difficulty))
            .and_then(|e| e.questions.clone())
    }

    /// 获取单个难度的完整状态快照
    pub fn get(&self, module_id: &str, difficulty: Difficulty) -> Option<DifficultyState> {
        self.entries
            .get(&Self::key(module_id, difficulty))
            .map(|e| e.value().clone())
    }

    pub fn module_status(&self, module_id: &str) -> ModuleStatus {
        ModuleStatus {
            easy: self.status(module_id, Difficulty::Easy),
            medium: self.status(module_id, Difficulty::Medium),
            high: self.status(module_id, Difficulty::High),
        }
    }

    /// 三个难度是否全部完成
    pub fn is_module_complete(&self, module_id: &str) -> bool {
        self.module_status(module_id).is_complete()
    }

    /// 合并三个难度的内容，未全部完成时返回 None
    pub fn complete_module_content(&self, module_id: &str) -> Option<ModuleContent> {
        if !self.is_module_complete(module_id) {
            return None;
        }

        let mut result = ModuleContent::default();
        for difficulty in Difficulty::ALL {
            let content = self
                .content(module_id, difficulty)
                .filter(|c| !c.is_empty());
            result.set_content(difficulty, content);
            result
                .questions
                .set(difficulty, self.questions(module_id, difficulty));
        }
        Some(result)
    }

    /// 清除模块的全部条目
    pub fn clear(&self, module_id: &str) {
        self.entries.retain(|(id, _), _| id != module_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
