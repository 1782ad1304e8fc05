//! 路由配置

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// 模块、正文与内容生成路由
fn module_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/modules",
            get(handlers::modules::list_modules).post(handlers::modules::create_module),
        )
        .route("/modules/upload", post(handlers::generation::upload_module))
        .route(
            "/modules/content",
            post(handlers::module_content::upsert_module_content),
        )
        .route(
            "/modules/content/get",
            get(handlers::module_content::get_module_content),
        )
        .route(
            "/modules/content/all",
            get(handlers::module_content::list_module_contents),
        )
        .route("/modules/{id}", get(handlers::modules::get_module))
        .route(
            "/modules/{id}/generate",
            post(handlers::generation::generate_module_content),
        )
        .route(
            "/modules/{id}/generation",
            get(handlers::generation::generation_status)
                .delete(handlers::generation::clear_generation),
        )
        .route(
            "/modules/{id}/generation/result",
            get(handlers::generation::generation_result),
        )
}

/// 题目与作答路由
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(handlers::items::create_items))
        .route(
            "/items/by-module-level",
            get(handlers::items::items_by_module_level),
        )
        .route(
            "/items/by-module-type",
            get(handlers::items::items_by_module_type),
        )
        .route("/attempts", post(handlers::attempts::create_attempt))
}

/// 分级与用户档案路由
fn learner_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/placements",
            get(handlers::placements::get_placement).post(handlers::placements::upsert_placement),
        )
        .route(
            "/placements/pretest",
            post(handlers::placements::submit_pretest),
        )
        .route(
            "/profiles",
            get(handlers::profiles::get_profile).put(handlers::profiles::update_profile),
        )
}

/// AI 接口路由
fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/generate", post(handlers::ai::generate))
        .route(
            "/ai/generate-questions",
            post(handlers::ai::generate_questions),
        )
        .route(
            "/ai/generate-learning-materials",
            post(handlers::ai::generate_learning_materials),
        )
        .route(
            "/ai/generate-feedback",
            post(handlers::ai::generate_feedback),
        )
        .route("/ai/answer-feedback", post(handlers::ai::answer_feedback))
}

/// 全部 API 路由，挂载在 `/api` 下
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(module_routes())
        .merge(item_routes())
        .merge(learner_routes())
        .merge(ai_routes())
}
