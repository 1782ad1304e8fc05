//! 分级 API
//!
//! 分级结果按 `(user_id, module_id)` 唯一；前测提交后按得分自动定级。

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use content_engine::{Difficulty, PretestGrade, grade_pretest, placement::level_for_score};
use sqlx::PgExecutor;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{PlacementQuery, PretestRequest, PretestResponse, UpsertPlacementRequest},
    error::{ApiError, Result},
    extract::ApiJson,
    handlers::{parse_uuid, required},
    models::Placement,
    state::AppState,
};

/// 新增或更新分级；未给出 level 时按得分推导
///
/// POST /api/placements
pub async fn upsert_placement(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpsertPlacementRequest>,
) -> Result<Json<Placement>> {
    req.validate()?;

    let level = match (&req.level, req.score) {
        (Some(level), _) => level.parse::<Difficulty>()?,
        (None, Some(score)) => level_for_score(score),
        (None, None) => {
            return Err(ApiError::Validation(
                "Level or score is required".to_string(),
            ));
        }
    };

    let row = upsert_placement_row(&state.pool, req.user_id, req.module_id, level, req.score).await?;
    info!(user_id = %row.user_id, module_id = %row.module_id, level = %row.level, "Placement saved");

    Ok(Json(row))
}

/// GET /api/placements?userId=..&moduleId=..
pub async fn get_placement(
    State(state): State<AppState>,
    Query(query): Query<PlacementQuery>,
) -> Result<Json<Placement>> {
    let (Some(user_id), Some(module_id)) = (required(&query.user_id), required(&query.module_id))
    else {
        return Err(ApiError::BadRequest(
            "User ID and Module ID are required".to_string(),
        ));
    };
    let user_id = parse_uuid(user_id, "user ID")?;
    let module_id = parse_uuid(module_id, "module ID")?;

    let row = sqlx::query_as::<_, Placement>(
        r#"
        SELECT id, user_id, module_id, level, score, updated_at
        FROM placements
        WHERE user_id = $1 AND module_id = $2
        "#,
    )
    .bind(user_id)
    .bind(module_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Placement not found".to_string()))?;

    Ok(Json(row))
}

/// 提交前测答案：判分、记录作答并定级
///
/// 不属于该模块的题目计为答错且不记录作答。
///
/// POST /api/placements/pretest
pub async fn submit_pretest(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PretestRequest>,
) -> Result<Json<PretestResponse>> {
    req.validate()?;

    let item_ids: Vec<Uuid> = req.answers.iter().map(|a| a.item_id).collect();
    let answer_key: HashMap<Uuid, Option<String>> = sqlx::query_as::<_, (Uuid, Option<String>)>(
        "SELECT id, answer FROM items WHERE module_id = $1 AND id = ANY($2)",
    )
    .bind(req.module_id)
    .bind(&item_ids)
    .fetch_all(&state.pool)
    .await?
    .into_iter()
    .collect();

    let PretestGrade { recorded, result } = grade_pretest(
        req.answers.iter().map(|a| (a.item_id, a.answer.as_str())),
        &answer_key,
    );

    let mut tx = state.pool.begin().await?;
    for graded in &recorded {
        sqlx::query(
            r#"
            INSERT INTO attempts (user_id, item_id, selected_answer, is_correct)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(req.user_id)
        .bind(graded.item_id)
        .bind(graded.answer)
        .bind(graded.is_correct)
        .execute(&mut *tx)
        .await?;
    }
    let placement = upsert_placement_row(
        &mut *tx,
        req.user_id,
        req.module_id,
        result.level,
        Some(result.score),
    )
    .await?;
    tx.commit().await?;

    info!(
        user_id = %req.user_id,
        module_id = %req.module_id,
        score = result.score,
        level = %result.level,
        "Pretest graded"
    );

    Ok(Json(PretestResponse {
        placement,
        score: result.score,
        correct: result.correct,
        total: result.total,
    }))
}

async fn upsert_placement_row<'e, E>(
    executor: E,
    user_id: Uuid,
    module_id: Uuid,
    level: Difficulty,
    score: Option<i32>,
) -> std::result::Result<Placement, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Placement>(
        r#"
        INSERT INTO placements (user_id, module_id, level, score)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, module_id)
        DO UPDATE SET level = EXCLUDED.level, score = EXCLUDED.score, updated_at = NOW()
        RETURNING id, user_id, module_id, level, score, updated_at
        "#,
    )
    .bind(user_id)
    .bind(module_id)
    .bind(level.as_str())
    .bind(score)
    .fetch_one(executor)
    .await
}
