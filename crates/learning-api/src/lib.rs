//! 自适应学习服务
//!
//! 提供模块、分级正文、题目、作答、分级测评与用户档案的 REST API，
//! 以及基于 Ollama 的分级内容生成与反馈接口。
//!
//! ## 模块结构
//!
//! - `handlers`: HTTP 请求处理器
//! - `dto`: 请求与组合响应
//! - `models`: 数据库行模型
//! - `routes`: 路由配置
//! - `state`: 应用状态
//! - `error`: 错误类型与响应映射
//! - `extract`: 统一错误体的请求体提取器

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use error::{ApiError, Result};
pub use extract::ApiJson;
pub use state::AppState;
