//! 测试套件模块
//!
//! 按业务功能组织的测试用例集合。

pub mod content_generation;
pub mod learner_flow;
pub mod module_content;
