//! 响应体
//!
//! CRUD 接口直接返回表行（见 `models`），这里只定义组合响应。

use content_engine::{
    ContentStore, Difficulty, GenerateOutput, GenerationStatus, ModuleContent, ModuleStatus,
};
use serde::Serialize;

use crate::models::{Item, Module, ModuleContentRow, Placement};

/// `/api/ai/generate` 响应
///
/// `total_duration` 取自模型返回的 `eval_duration`，与既有前端约定一致。
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub response: String,
    pub model: Option<String>,
    pub total_duration: Option<u64>,
}

impl From<GenerateOutput> for GenerateResponse {
    fn from(output: GenerateOutput) -> Self {
        Self {
            response: output.response,
            model: output.model,
            total_duration: output.eval_duration,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerFeedbackResponse {
    pub feedback: String,
}

/// 分级测评结果
#[derive(Debug, Serialize)]
pub struct PretestResponse {
    pub placement: Placement,
    pub score: i32,
    pub correct: usize,
    pub total: usize,
}

/// 单个难度的生成状态
#[derive(Debug, Serialize)]
pub struct LevelStatus {
    pub difficulty: Difficulty,
    pub status: GenerationStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerationStatusResponse {
    pub module_id: String,
    pub complete: bool,
    pub levels: Vec<LevelStatus>,
}

impl GenerationStatusResponse {
    pub fn from_store(store: &ContentStore, module_id: &str) -> Self {
        let levels = Difficulty::ALL
            .into_iter()
            .map(|difficulty| {
                let state = store.get(module_id, difficulty).unwrap_or_default();
                LevelStatus {
                    difficulty,
                    status: state.status,
                    progress: state.status.progress(),
                    error: state.error,
                }
            })
            .collect();

        Self {
            module_id: module_id.to_string(),
            complete: store.is_module_complete(module_id),
            levels,
        }
    }
}

/// 写入数据库的生成结果
#[derive(Debug, Default, Serialize)]
pub struct PersistedContent {
    pub contents: Vec<ModuleContentRow>,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct GenerateModuleResponse {
    pub module_id: String,
    pub content: ModuleContent,
    pub status: ModuleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<PersistedContent>,
}

#[derive(Debug, Serialize)]
pub struct UploadModuleResponse {
    pub module: Module,
    pub contents: Vec<ModuleContentRow>,
    pub items: Vec<Item>,
}
