//! 用户档案 API

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{UpdateProfileRequest, UserQuery},
    error::{ApiError, Result},
    extract::ApiJson,
    handlers::{parse_uuid, required},
    models::Profile,
    state::AppState,
};

fn user_id_from(query: &UserQuery) -> Result<uuid::Uuid> {
    let user_id = required(&query.user_id)
        .ok_or_else(|| ApiError::BadRequest("User ID is required".to_string()))?;
    parse_uuid(user_id, "user ID")
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// GET /api/profiles?userId=..
pub async fn get_profile(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Profile>> {
    let user_id = user_id_from(&query)?;

    let row = sqlx::query_as::<_, Profile>(
        "SELECT id, full_name, email, role, created_at FROM profiles WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(user_not_found)?;

    Ok(Json(row))
}

/// 更新档案，三个字段整体覆盖
///
/// PUT /api/profiles?userId=..
pub async fn update_profile(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let user_id = user_id_from(&query)?;
    req.validate()?;

    let row = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET full_name = $1, email = $2, role = $3
        WHERE id = $4
        RETURNING id, full_name, email, role, created_at
        "#,
    )
    .bind(&req.full_name)
    .bind(&req.email)
    .bind(&req.role)
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(user_not_found)?;

    info!(user_id = %row.id, "Profile updated");

    Ok(Json(row))
}
