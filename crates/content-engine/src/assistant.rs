//! 即席 AI 接口
//!
//! 直接透传提示词，以及按主题生成选择题和学习材料。
//! 这些接口默认使用轻量模型，输出通常是 JSON 数组。

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::extract::extract_json_value;
use crate::llm::{GenerateOutput, GenerateRequest, LlmClient};
use crate::prompt::{learning_materials_prompt, questions_prompt};

/// 默认题目数量
pub const DEFAULT_NUM_QUESTIONS: u32 = 30;
/// 默认学习材料数量
pub const DEFAULT_NUM_ITEMS: u32 = 10;

#[derive(Clone)]
pub struct AssistantService {
    llm: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
}

impl AssistantService {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature,
        }
    }

    /// 透传提示词，未指定模型时使用默认模型
    pub async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<GenerateOutput> {
        if prompt.trim().is_empty() {
            return Err(EngineError::Validation("Prompt is required".to_string()));
        }

        let model = model.filter(|m| !m.is_empty()).unwrap_or(self.model.as_str());
        let request = GenerateRequest::new(model, prompt)
            .with_temperature(self.temperature)
            .with_kind("generate");
        self.llm.generate(request).await
    }

    /// 按主题和难度生成选择题
    pub async fn generate_questions(
        &self,
        topic: &str,
        level: &str,
        num_questions: u32,
    ) -> Result<Value> {
        info!(topic, level, num_questions, "Generating questions");
        self.generate_json(questions_prompt(topic, level, num_questions), "questions")
            .await
    }

    /// 按主题和难度生成学习材料
    pub async fn generate_learning_materials(
        &self,
        topic: &str,
        level: &str,
        num_items: u32,
    ) -> Result<Value> {
        info!(topic, level, num_items, "Generating learning materials");
        self.generate_json(
            learning_materials_prompt(topic, level, num_items),
            "learning_materials",
        )
        .await
    }

    async fn generate_json(&self, prompt: String, kind: &'static str) -> Result<Value> {
        let request = GenerateRequest::new(self.model.clone(), prompt)
            .with_temperature(self.temperature)
            .with_kind(kind);
        let output = self.llm.generate(request).await?;
        extract_json_value(&output.response)
    }
}
