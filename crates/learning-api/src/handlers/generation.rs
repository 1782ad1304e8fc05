//! 分级内容生成 API
//!
//! 生成状态保存在进程内存中，以模块 ID 为键；
//! 需要持久化时在同一事务中写入正文与练习题。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use content_engine::{
    Difficulty, GenerationMode, ModuleContent,
    validation::validate_complete_module_content,
};
use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        GenerateModuleRequest, GenerateModuleResponse, GenerationStatusResponse, PersistedContent,
        UploadModuleRequest, UploadModuleResponse,
    },
    error::{ApiError, Result},
    extract::ApiJson,
    handlers::{
        items::insert_item, module_content::upsert_content, modules::fetch_module, parse_uuid,
    },
    models::{Module, NewItem, QuestionType},
    state::AppState,
};

/// 生成题目的分组
const PRACTICE_ITEM_TYPE: &str = "practice";

fn resolve_mode(state: &AppState, mode: Option<&str>) -> Result<GenerationMode> {
    match mode.map(str::trim).filter(|m| !m.is_empty()) {
        Some(mode) => Ok(mode.parse()?),
        None => Ok(state.default_mode),
    }
}

/// 模型输出不合格属于生成失败，而非请求错误
fn check_generated(content: &ModuleContent) -> Result<()> {
    validate_complete_module_content(content).map_err(|e| ApiError::Generation(e.to_string()))
}

/// 为已有模块生成内容
///
/// 指定 `difficulty` 时只生成该难度，否则按模式生成全部难度。
///
/// POST /api/modules/{id}/generate
pub async fn generate_module_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<GenerateModuleRequest>,
) -> Result<Json<GenerateModuleResponse>> {
    let module_id = parse_uuid(&id, "module ID")?;
    req.validate()?;
    let module = fetch_module(&state.pool, module_id).await?;
    let key = module_id.to_string();

    let content = match req.difficulty.as_deref() {
        Some(difficulty) => {
            let difficulty: Difficulty = difficulty.parse()?;
            state
                .generator
                .generate_difficulty(&key, difficulty, &req.module_text, &module.title)
                .await?
        }
        None => {
            let mode = resolve_mode(&state, req.mode.as_deref())?;
            state
                .generator
                .generate(&key, &req.module_text, &module.title, mode)
                .await?
        }
    };

    let status = state.generator.module_status(&key);

    // 已入库的内容不再保留在内存中；未入库时保留，供 /generation/result 读取
    let persisted = if req.persist {
        let persisted = persist_module_content(&state, module_id, &content).await;
        state.generator.clear(&key);
        let persisted = persisted?;
        info!(
            module_id = %module_id,
            contents = persisted.contents.len(),
            items = persisted.items.len(),
            "Generated content persisted"
        );
        Some(persisted)
    } else {
        None
    };

    Ok(Json(GenerateModuleResponse {
        status,
        module_id: key,
        content,
        persisted,
    }))
}

async fn persist_module_content(
    state: &AppState,
    module_id: Uuid,
    content: &ModuleContent,
) -> Result<PersistedContent> {
    check_generated(content)?;
    let mut tx = state.pool.begin().await?;
    let persisted = persist_generated(&mut tx, module_id, content).await?;
    tx.commit().await?;
    Ok(persisted)
}

/// 查询生成进度
///
/// GET /api/modules/{id}/generation
pub async fn generation_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GenerationStatusResponse>> {
    let key = parse_uuid(&id, "module ID")?.to_string();
    Ok(Json(GenerationStatusResponse::from_store(
        state.generator.store(),
        &key,
    )))
}

/// 获取三个难度合并后的完整内容
///
/// GET /api/modules/{id}/generation/result
pub async fn generation_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ModuleContent>> {
    let key = parse_uuid(&id, "module ID")?.to_string();
    state
        .generator
        .complete_module_content(&key)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Generated content is not complete".to_string()))
}

/// 丢弃未入库的生成结果
///
/// DELETE /api/modules/{id}/generation
pub async fn clear_generation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let key = parse_uuid(&id, "module ID")?.to_string();
    state.generator.clear(&key);
    Ok(StatusCode::NO_CONTENT)
}

/// 教师上传：生成全部难度后在一个事务中创建模块、写入正文与练习题
///
/// POST /api/modules/upload
pub async fn upload_module(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UploadModuleRequest>,
) -> Result<(StatusCode, Json<UploadModuleResponse>)> {
    req.validate()?;
    let mode = resolve_mode(&state, req.mode.as_deref())?;

    // 先分配模块 ID，生成期间即可按该 ID 查询进度
    let module_id = Uuid::new_v4();
    let key = module_id.to_string();
    info!(module_id = %module_id, title = %req.title, ?mode, "Module upload started");

    // 无论成功与否，结束后都释放内存中的生成状态
    let result = generate_and_create(&state, module_id, &req, mode).await;
    state.generator.clear(&key);
    let (module, persisted) = result?;

    info!(
        module_id = %module.id,
        contents = persisted.contents.len(),
        items = persisted.items.len(),
        "Module uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadModuleResponse {
            module,
            contents: persisted.contents,
            items: persisted.items,
        }),
    ))
}

async fn generate_and_create(
    state: &AppState,
    module_id: Uuid,
    req: &UploadModuleRequest,
    mode: GenerationMode,
) -> Result<(Module, PersistedContent)> {
    let content = state
        .generator
        .generate(&module_id.to_string(), &req.module_text, &req.title, mode)
        .await?;
    check_generated(&content)?;

    let mut tx = state.pool.begin().await?;
    let module = sqlx::query_as::<_, Module>(
        r#"
        INSERT INTO modules (id, instructor_id, title, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, instructor_id, title, description, created_at
        "#,
    )
    .bind(module_id)
    .bind(req.instructor_id)
    .bind(&req.title)
    .bind(&req.description)
    .fetch_one(&mut *tx)
    .await?;
    let persisted = persist_generated(&mut tx, module_id, &content).await?;
    tx.commit().await?;

    Ok((module, persisted))
}

/// 写入非空难度的正文及其题目
async fn persist_generated(
    conn: &mut PgConnection,
    module_id: Uuid,
    content: &ModuleContent,
) -> Result<PersistedContent> {
    let mut persisted = PersistedContent::default();

    for difficulty in Difficulty::ALL {
        let Some(text) = content.content(difficulty).filter(|t| !t.is_empty()) else {
            continue;
        };
        persisted
            .contents
            .push(upsert_content(&mut *conn, module_id, difficulty, text).await?);

        let Some(set) = content.questions(difficulty) else {
            continue;
        };
        let questions = set
            .mcq
            .iter()
            .map(|q| (QuestionType::Mcq, q))
            .chain(set.short.iter().map(|q| (QuestionType::Short, q)));
        for (question_type, question) in questions {
            let new_item = NewItem::from_question(
                module_id,
                difficulty,
                PRACTICE_ITEM_TYPE,
                question_type,
                question,
            );
            persisted.items.push(insert_item(&mut *conn, &new_item).await?);
        }
    }

    Ok(persisted)
}
