//! 测试辅助工具模块
//!
//! 提供 API 客户端与数据库验证。

mod api_client;
mod db_verifier;

pub use api_client::*;
pub use db_verifier::*;
