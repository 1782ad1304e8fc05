//! 学习模块 API

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::CreateModuleRequest,
    error::{ApiError, Result},
    extract::ApiJson,
    handlers::parse_uuid,
    models::Module,
    state::AppState,
};

/// 获取全部模块，最新的在前
///
/// GET /api/modules
pub async fn list_modules(State(state): State<AppState>) -> Result<Json<Vec<Module>>> {
    let rows = sqlx::query_as::<_, Module>(
        r#"
        SELECT id, instructor_id, title, description, created_at
        FROM modules
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

/// 创建模块
///
/// POST /api/modules
pub async fn create_module(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateModuleRequest>,
) -> Result<(StatusCode, Json<Module>)> {
    req.validate()?;

    let row = sqlx::query_as::<_, Module>(
        r#"
        INSERT INTO modules (instructor_id, title, description)
        VALUES ($1, $2, $3)
        RETURNING id, instructor_id, title, description, created_at
        "#,
    )
    .bind(req.instructor_id)
    .bind(&req.title)
    .bind(&req.description)
    .fetch_one(&state.pool)
    .await?;

    info!(module_id = %row.id, title = %row.title, "Module created");

    Ok((StatusCode::CREATED, Json(row)))
}

/// 获取单个模块
///
/// GET /api/modules/{id}
pub async fn get_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Module>> {
    let id = parse_uuid(&id, "module ID")?;
    Ok(Json(fetch_module(&state.pool, id).await?))
}

pub(crate) async fn fetch_module(pool: &PgPool, id: Uuid) -> Result<Module> {
    sqlx::query_as::<_, Module>(
        r#"
        SELECT id, instructor_id, title, description, created_at
        FROM modules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))
}
