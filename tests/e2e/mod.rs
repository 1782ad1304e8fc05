//! 自适应学习服务端到端测试
//!
//! 针对运行中的 learning-api 与 PostgreSQL，覆盖：
//! - 模块与分级正文
//! - 题目、作答与分级测评
//! - 用户档案
//! - 内容生成（需要可用的 Ollama）

pub mod helpers;
pub mod setup;
pub mod suites;

pub use setup::TestEnvironment;
