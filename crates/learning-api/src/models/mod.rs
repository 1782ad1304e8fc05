//! 数据库行模型
//!
//! 字段与表列一一对应，直接作为响应体序列化。

pub mod item;
pub mod learner;
pub mod module;

pub use item::{Attempt, Item, NewItem, QuestionType};
pub use learner::{Placement, Profile, Role};
pub use module::{Module, ModuleContentRow};
