//! 模块分级正文 API

use axum::{
    Json,
    extract::{Query, State},
};
use content_engine::Difficulty;
use sqlx::PgExecutor;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{ModuleLevelQuery, ModuleQuery, UpsertModuleContentRequest},
    error::{ApiError, Result},
    extract::ApiJson,
    handlers::{parse_uuid, required},
    models::ModuleContentRow,
    state::AppState,
};

/// 新增或更新某一难度的正文，按 `(module_id, level)` 去重
///
/// POST /api/modules/content
pub async fn upsert_module_content(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpsertModuleContentRequest>,
) -> Result<Json<ModuleContentRow>> {
    req.validate()?;
    let level: Difficulty = req.level.parse()?;

    let row = upsert_content(&state.pool, req.module_id, level, &req.content).await?;
    info!(module_id = %row.module_id, level = %row.level, "Module content saved");

    Ok(Json(row))
}

/// 获取某一难度的正文
///
/// GET /api/modules/content/get?moduleId=..&level=..
pub async fn get_module_content(
    State(state): State<AppState>,
    Query(query): Query<ModuleLevelQuery>,
) -> Result<Json<ModuleContentRow>> {
    let (Some(module_id), Some(level)) = (required(&query.module_id), required(&query.level))
    else {
        return Err(ApiError::BadRequest(
            "Module ID and level are required".to_string(),
        ));
    };
    let module_id = parse_uuid(module_id, "module ID")?;
    let level: Difficulty = level.parse()?;

    // 旧数据可能以 hard 存储
    let row = sqlx::query_as::<_, ModuleContentRow>(
        r#"
        SELECT id, module_id, level, content, created_at, updated_at
        FROM module_contents
        WHERE module_id = $1 AND level = ANY($2)
        ORDER BY updated_at DESC
        LIMIT 1
        "#,
    )
    .bind(module_id)
    .bind(level.stored_names())
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Module content not found".to_string()))?;

    Ok(Json(row))
}

/// 获取模块的全部正文
///
/// GET /api/modules/content/all?moduleId=..
pub async fn list_module_contents(
    State(state): State<AppState>,
    Query(query): Query<ModuleQuery>,
) -> Result<Json<Vec<ModuleContentRow>>> {
    let module_id = required(&query.module_id)
        .ok_or_else(|| ApiError::BadRequest("Module ID is required".to_string()))?;
    let module_id = parse_uuid(module_id, "module ID")?;

    let rows = sqlx::query_as::<_, ModuleContentRow>(
        r#"
        SELECT id, module_id, level, content, created_at, updated_at
        FROM module_contents
        WHERE module_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(module_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub(crate) async fn upsert_content<'e, E>(
    executor: E,
    module_id: Uuid,
    level: Difficulty,
    content: &str,
) -> std::result::Result<ModuleContentRow, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, ModuleContentRow>(
        r#"
        INSERT INTO module_contents (module_id, level, content)
        VALUES ($1, $2, $3)
        ON CONFLICT (module_id, level)
        DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
        RETURNING id, module_id, level, content, created_at, updated_at
        "#,
    )
    .bind(module_id)
    .bind(level.as_str())
    .bind(content)
    .fetch_one(executor)
    .await
}
