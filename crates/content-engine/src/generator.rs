//! 分级内容生成管理
//!
//! 每个难度独立调用一次模型：构建提示词 → 提取 JSON → 宽松解析 → 修正 → 校验 → 写入存储。
//! 状态变化通过 broadcast 通道发布，供调用方跟踪进度。

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use learning_shared::config::{GenerationConfig, LlmConfig};
use learning_shared::observability::metrics;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument};

use crate::error::{EngineError, Result};
use crate::extract::{extract_json_object, parse_lenient};
use crate::llm::{GenerateRequest, LlmClient};
use crate::models::{
    Difficulty, GenerationMode, GenerationStatus, ModuleContent, ModuleStatus, ProgressEvent,
    QuestionSet,
};
use crate::prompt::{difficulty_prompt, truncate_chars};
use crate::store::ContentStore;
use crate::validation::{coerce_module_content, merge_module_content, validate_module_content};

/// 生成参数
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub model: String,
    pub temperature: f32,
    pub channel_capacity: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: "llama3.1:8b".to_string(),
            temperature: 0.7,
            channel_capacity: 64,
        }
    }
}

impl GeneratorSettings {
    pub fn from_config(llm: &LlmConfig, generation: &GenerationConfig) -> Self {
        Self {
            model: llm.model.clone(),
            temperature: llm.temperature,
            channel_capacity: generation.progress_channel_capacity.max(1),
        }
    }
}

/// 生成管理器
#[derive(Clone)]
pub struct GenerationManager {
    llm: Arc<dyn LlmClient>,
    store: ContentStore,
    settings: GeneratorSettings,
    events: broadcast::Sender<ProgressEvent>,
}

impl GenerationManager {
    pub fn new(llm: Arc<dyn LlmClient>, settings: GeneratorSettings) -> Self {
        let (events, _) = broadcast::channel(settings.channel_capacity.max(1));
        Self {
            llm,
            store: ContentStore::new(),
            settings,
            events,
        }
    }

    /// 订阅进度事件
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    fn set_status(
        &self,
        module_id: &str,
        difficulty: Difficulty,
        status: GenerationStatus,
        error: Option<String>,
    ) {
        self.store
            .update_status(module_id, difficulty, status, error.clone());
        // 没有订阅者时发送失败，可以忽略
        let _ = self
            .events
            .send(ProgressEvent::new(module_id, difficulty, status, error));
    }

    /// 生成单个难度，返回仅包含该难度的内容
    #[instrument(skip(self, module_text, module_title), fields(%difficulty))]
    pub async fn generate_difficulty(
        &self,
        module_id: &str,
        difficulty: Difficulty,
        module_text: &str,
        module_title: &str,
    ) -> Result<ModuleContent> {
        let start = Instant::now();
        self.set_status(module_id, difficulty, GenerationStatus::Generating, None);

        match self.request_content(difficulty, module_text, module_title).await {
            Ok(content) => {
                for level in Difficulty::ALL {
                    if let Some(text) = content.content(level).filter(|t| !t.is_empty()) {
                        self.store.update_content(
                            module_id,
                            level,
                            text.to_string(),
                            content.questions(level).cloned(),
                        );
                    }
                }

                self.set_status(module_id, difficulty, GenerationStatus::Completed, None);
                metrics::record_generation(
                    difficulty.as_str(),
                    "completed",
                    start.elapsed().as_secs_f64(),
                );
                info!(module_id, %difficulty, "Difficulty content generated");

                let mut result = ModuleContent::default();
                result.set_content(difficulty, self.store.content(module_id, difficulty));
                result.questions.set(
                    difficulty,
                    Some(
                        self.store
                            .questions(module_id, difficulty)
                            .unwrap_or_default(),
                    ),
                );
                Ok(result)
            }
            Err(e) => {
                let message = e.to_string();
                error!(module_id, %difficulty, error = %message, "Difficulty content generation failed");
                self.set_status(
                    module_id,
                    difficulty,
                    GenerationStatus::Error,
                    Some(message.clone()),
                );
                metrics::record_generation(
                    difficulty.as_str(),
                    "error",
                    start.elapsed().as_secs_f64(),
                );
                Err(EngineError::GenerationFailed {
                    difficulty,
                    reason: message,
                })
            }
        }
    }

    async fn request_content(
        &self,
        difficulty: Difficulty,
        module_text: &str,
        module_title: &str,
    ) -> Result<ModuleContent> {
        let prompt = difficulty_prompt(difficulty, module_title, module_text);
        let request = GenerateRequest::new(self.settings.model.clone(), prompt)
            .with_temperature(self.settings.temperature)
            .with_kind("content");

        let output = self.llm.generate(request).await?;
        debug!(
            %difficulty,
            preview = %truncate_chars(&output.response, 200),
            "raw model output"
        );

        let json = extract_json_object(&output.response)?;
        let value = parse_lenient(&json)?;
        let content = coerce_module_content(&value);
        validate_module_content(&content)?;
        Ok(content)
    }

    /// 串行生成 easy → medium → high，首个失败即停止
    pub async fn generate_serial(
        &self,
        module_id: &str,
        module_text: &str,
        module_title: &str,
    ) -> Result<ModuleContent> {
        let mut parts = Vec::with_capacity(Difficulty::ALL.len());
        for difficulty in Difficulty::ALL {
            info!(module_id, %difficulty, title = module_title, "Generating content");
            let part = self
                .generate_difficulty(module_id, difficulty, module_text, module_title)
                .await?;
            parts.push(part);
        }
        Ok(merge_module_content(&parts))
    }

    /// 并行生成三个难度；任一失败时返回 `PartialFailure`，成功的难度仍保留在存储中
    pub async fn generate_parallel(
        &self,
        module_id: &str,
        module_text: &str,
        module_title: &str,
    ) -> Result<ModuleContent> {
        let results = join_all(Difficulty::ALL.map(|difficulty| {
            self.generate_difficulty(module_id, difficulty, module_text, module_title)
        }))
        .await;

        let mut parts = Vec::new();
        let mut failed = Vec::new();
        for (difficulty, result) in Difficulty::ALL.into_iter().zip(results) {
            match result {
                Ok(part) => parts.push(part),
                Err(_) => failed.push(difficulty),
            }
        }

        if !failed.is_empty() {
            return Err(EngineError::PartialFailure { failed });
        }
        Ok(merge_module_content(&parts))
    }

    /// 按模式生成全部难度
    pub async fn generate(
        &self,
        module_id: &str,
        module_text: &str,
        module_title: &str,
        mode: GenerationMode,
    ) -> Result<ModuleContent> {
        match mode {
            GenerationMode::Serial => {
                self.generate_serial(module_id, module_text, module_title)
                    .await
            }
            GenerationMode::Parallel => {
                self.generate_parallel(module_id, module_text, module_title)
                    .await
            }
        }
    }

    pub fn status(&self, module_id: &str, difficulty: Difficulty) -> GenerationStatus {
        self.store.status(module_id, difficulty)
    }

    pub fn error(&self, module_id: &str, difficulty: Difficulty) -> Option<String> {
        self.store.error(module_id, difficulty)
    }

    pub fn module_status(&self, module_id: &str) -> ModuleStatus {
        self.store.module_status(module_id)
    }

    pub fn content(&self, module_id: &str, difficulty: Difficulty) -> Option<String> {
        self.store.content(module_id, difficulty)
    }

    pub fn questions(&self, module_id: &str, difficulty: Difficulty) -> Option<QuestionSet> {
        self.store.questions(module_id, difficulty)
    }

    pub fn complete_module_content(&self, module_id: &str) -> Option<ModuleContent> {
        self.store.complete_module_content(module_id)
    }

    pub fn initialize(&self, module_id: &str, difficulty: Difficulty) {
        self.store.initialize(module_id, difficulty);
    }

    /// 释放模块的生成状态
    pub fn clear(&self, module_id: &str) {
        self.store.clear(module_id);
        debug!(module_id, "generation state cleared");
    }
}
