//! 自适应学习内容引擎
//!
//! 负责分级学习内容的生成与管理，支持：
//! - 从模型的非结构化输出中提取 JSON
//! - 内容结构的宽松修正与校验
//! - 按难度构建提示词并调用 Ollama
//! - 按模块与难度跟踪生成状态（串行 / 并行）
//! - 作答反馈与分级测评

pub mod assistant;
pub mod error;
pub mod extract;
pub mod feedback;
pub mod generator;
pub mod llm;
pub mod models;
pub mod placement;
pub mod prompt;
pub mod store;
pub mod validation;

pub use assistant::AssistantService;
pub use error::{EngineError, Result};
pub use extract::{extract_json_object, extract_json_value, parse_lenient};
pub use feedback::{FEEDBACK_UNAVAILABLE, FeedbackService, PerformanceFeedback};
pub use generator::{GenerationManager, GeneratorSettings};
pub use llm::{GenerateOutput, GenerateRequest, LlmClient, OllamaClient};
pub use models::{
    Difficulty, GenerationMode, GenerationStatus, ModuleContent, ModuleStatus, ProgressEvent,
    Question, QuestionSet,
};
pub use placement::{GradedAnswer, PlacementResult, PretestGrade, grade_pretest};
pub use store::{ContentStore, DifficultyState};
