//! 应用状态

use std::sync::Arc;

use content_engine::{
    AssistantService, FeedbackService, GenerationManager, GenerationMode, GeneratorSettings,
    LlmClient,
};
use learning_shared::config::AppConfig;
use sqlx::PgPool;
use tracing::warn;

/// 所有处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub generator: GenerationManager,
    pub feedback: FeedbackService,
    pub assistant: AssistantService,
    /// 请求未指定模式时使用
    pub default_mode: GenerationMode,
}

impl AppState {
    /// 按配置组装，三个服务共用同一个 LLM 客户端
    pub fn new(pool: PgPool, llm: Arc<dyn LlmClient>, config: &AppConfig) -> Self {
        let generator = GenerationManager::new(
            llm.clone(),
            GeneratorSettings::from_config(&config.llm, &config.generation),
        );

        // 单题反馈使用内容生成模型，测评反馈与其他即席接口使用轻量模型
        let feedback = FeedbackService::new(
            llm.clone(),
            config.llm.model.clone(),
            config.llm.feedback_temperature,
            config.llm.adhoc_model.clone(),
            config.llm.temperature,
        );
        let assistant =
            AssistantService::new(llm, config.llm.adhoc_model.clone(), config.llm.temperature);

        let default_mode = config
            .generation
            .default_mode
            .parse()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Invalid generation.default_mode, falling back to serial");
                GenerationMode::default()
            });

        Self {
            pool,
            generator,
            feedback,
            assistant,
            default_mode,
        }
    }
}
