//! 即席 AI 接口

use axum::{Json, extract::State};
use content_engine::PerformanceFeedback;
use serde_json::Value;
use validator::Validate;

use crate::{
    dto::{
        AnswerFeedbackRequest, AnswerFeedbackResponse, GenerateFeedbackRequest,
        GenerateLearningMaterialsRequest, GeneratePromptRequest, GenerateQuestionsRequest,
        GenerateResponse,
    },
    error::Result,
    extract::ApiJson,
    state::AppState,
};

/// 透传提示词
///
/// POST /api/ai/generate
pub async fn generate(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GeneratePromptRequest>,
) -> Result<Json<GenerateResponse>> {
    let output = state
        .assistant
        .generate(&req.prompt, req.model.as_deref())
        .await?;
    Ok(Json(output.into()))
}

/// POST /api/ai/generate-questions
pub async fn generate_questions(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateQuestionsRequest>,
) -> Result<Json<Value>> {
    req.validate()?;
    let questions = state
        .assistant
        .generate_questions(&req.topic, &req.level, req.num_questions)
        .await?;
    Ok(Json(questions))
}

/// POST /api/ai/generate-learning-materials
pub async fn generate_learning_materials(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateLearningMaterialsRequest>,
) -> Result<Json<Value>> {
    req.validate()?;
    let materials = state
        .assistant
        .generate_learning_materials(&req.topic, &req.level, req.num_items)
        .await?;
    Ok(Json(materials))
}

/// 前后测对比反馈
///
/// POST /api/ai/generate-feedback
pub async fn generate_feedback(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateFeedbackRequest>,
) -> Result<Json<PerformanceFeedback>> {
    req.validate()?;
    let feedback = state
        .feedback
        .performance_feedback(req.pre_test_score, req.post_test_score, &req.topic, &req.level)
        .await?;
    Ok(Json(feedback))
}

/// 单题反馈，模型不可用时返回固定提示
///
/// POST /api/ai/answer-feedback
pub async fn answer_feedback(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnswerFeedbackRequest>,
) -> Result<Json<AnswerFeedbackResponse>> {
    req.validate()?;
    let feedback = state
        .feedback
        .answer_feedback(&req.question, &req.correct_answer, &req.student_answer)
        .await;
    Ok(Json(AnswerFeedbackResponse { feedback }))
}
