//! 作答记录 API

use axum::{Json, extract::State, http::StatusCode};
use content_engine::{FeedbackService, placement::answers_match};
use tracing::info;

use crate::{
    dto::CreateAttemptRequest, error::Result, extract::ApiJson, models::Attempt, state::AppState,
};

impl CreateAttemptRequest {
    /// 确定写入的反馈与正误
    ///
    /// 已带 `ai_feedback` 时原样使用；否则在 `request_feedback` 且题目与标准答案齐全时生成。
    /// 未给出 `is_correct` 时按标准答案判定。
    async fn resolve_outcome(&self, feedback: &FeedbackService) -> (Option<String>, Option<bool>) {
        let selected = self.selected_answer.as_deref().unwrap_or_default();

        let ai_feedback = match (&self.ai_feedback, &self.question, &self.correct_answer) {
            (None, Some(question), Some(correct)) if self.request_feedback => {
                Some(feedback.answer_feedback(question, correct, selected).await)
            }
            _ => self.ai_feedback.clone(),
        };

        let is_correct = self.is_correct.or_else(|| {
            self.correct_answer
                .as_deref()
                .zip(self.selected_answer.as_deref())
                .map(|(correct, given)| answers_match(correct, given))
        });

        (ai_feedback, is_correct)
    }
}

/// 记录作答
///
/// POST /api/attempts
pub async fn create_attempt(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateAttemptRequest>,
) -> Result<(StatusCode, Json<Attempt>)> {
    let (ai_feedback, is_correct) = req.resolve_outcome(&state.feedback).await;

    let row = sqlx::query_as::<_, Attempt>(
        r#"
        INSERT INTO attempts (user_id, item_id, selected_answer, ai_feedback, is_correct)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, item_id, selected_answer, ai_feedback, is_correct, created_at
        "#,
    )
    .bind(req.user_id)
    .bind(req.item_id)
    .bind(&req.selected_answer)
    .bind(&ai_feedback)
    .bind(is_correct)
    .fetch_one(&state.pool)
    .await?;

    info!(attempt_id = %row.id, user_id = %row.user_id, item_id = %row.item_id, "Attempt recorded");

    Ok((StatusCode::CREATED, Json(row)))
}
