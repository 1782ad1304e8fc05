//! 题目 API

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use content_engine::Difficulty;
use sqlx::PgExecutor;
use tracing::info;
use validator::Validate;

use crate::{
    dto::{CreateItemRequest, CreateItemsBody, ModuleLevelQuery, ModuleTypeQuery},
    error::{ApiError, Result},
    extract::ApiJson,
    handlers::{parse_uuid, required},
    models::{Item, NewItem, QuestionType},
    state::AppState,
};

impl CreateItemRequest {
    /// 校验并规范化难度与题型
    fn into_new_item(self) -> Result<NewItem> {
        self.validate()?;
        let level: Difficulty = self.level.parse()?;
        let question_type: QuestionType =
            self.question_type.parse().map_err(ApiError::Validation)?;

        Ok(NewItem {
            module_id: self.module_id,
            level,
            item_type: self.item_type,
            question_type,
            question: self.question,
            options: self.options,
            answer: self.answer,
            explanation: self.explanation,
        })
    }
}

/// 创建题目：单个对象返回单行，数组在同一事务中插入并返回全部行
///
/// POST /api/items
pub async fn create_items(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateItemsBody>,
) -> Result<Response> {
    match body {
        CreateItemsBody::One(req) => {
            let new_item = req.into_new_item()?;
            let row = insert_item(&state.pool, &new_item).await?;
            info!(item_id = %row.id, module_id = %row.module_id, "Item created");
            Ok((StatusCode::CREATED, Json(row)).into_response())
        }
        CreateItemsBody::Many(reqs) => {
            if reqs.is_empty() {
                return Err(ApiError::BadRequest("No items provided".to_string()));
            }
            let new_items = reqs
                .into_iter()
                .map(CreateItemRequest::into_new_item)
                .collect::<Result<Vec<_>>>()?;

            let mut tx = state.pool.begin().await?;
            let mut rows = Vec::with_capacity(new_items.len());
            for new_item in &new_items {
                rows.push(insert_item(&mut *tx, new_item).await?);
            }
            tx.commit().await?;

            info!(count = rows.len(), "Items created");
            Ok((StatusCode::CREATED, Json(rows)).into_response())
        }
    }
}

/// 按模块与难度查询题目
///
/// GET /api/items/by-module-level?moduleId=..&level=..
pub async fn items_by_module_level(
    State(state): State<AppState>,
    Query(query): Query<ModuleLevelQuery>,
) -> Result<Json<Vec<Item>>> {
    let (Some(module_id), Some(level)) = (required(&query.module_id), required(&query.level))
    else {
        return Err(ApiError::BadRequest(
            "Module ID and level are required".to_string(),
        ));
    };
    let module_id = parse_uuid(module_id, "module ID")?;
    let level: Difficulty = level.parse()?;

    let rows = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, module_id, level, type, question_type, question, options, answer, explanation, created_at
        FROM items
        WHERE module_id = $1 AND level = ANY($2)
        ORDER BY created_at
        "#,
    )
    .bind(module_id)
    .bind(level.stored_names())
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

/// 按模块与分组查询题目，可选按难度过滤
///
/// GET /api/items/by-module-type?moduleId=..&type=..[&level=..]
pub async fn items_by_module_type(
    State(state): State<AppState>,
    Query(query): Query<ModuleTypeQuery>,
) -> Result<Json<Vec<Item>>> {
    let (Some(module_id), Some(item_type)) =
        (required(&query.module_id), required(&query.item_type))
    else {
        return Err(ApiError::BadRequest(
            "Module ID and type are required".to_string(),
        ));
    };
    let module_id = parse_uuid(module_id, "module ID")?;
    let levels = required(&query.level)
        .map(|level| level.parse::<Difficulty>())
        .transpose()?
        .map(|level| level.stored_names());

    let rows = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, module_id, level, type, question_type, question, options, answer, explanation, created_at
        FROM items
        WHERE module_id = $1
          AND type = $2
          AND ($3::text[] IS NULL OR level = ANY($3))
        ORDER BY created_at
        "#,
    )
    .bind(module_id)
    .bind(item_type)
    .bind(levels)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub(crate) async fn insert_item<'e, E>(
    executor: E,
    item: &NewItem,
) -> std::result::Result<Item, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (module_id, level, type, question_type, question, options, answer, explanation)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, module_id, level, type, question_type, question, options, answer, explanation, created_at
        "#,
    )
    .bind(item.module_id)
    .bind(item.level.as_str())
    .bind(&item.item_type)
    .bind(item.question_type.as_str())
    .bind(&item.question)
    .bind(&item.options)
    .bind(&item.answer)
    .bind(&item.explanation)
    .fetch_one(executor)
    .await
}
