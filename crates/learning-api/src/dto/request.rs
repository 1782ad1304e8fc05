//! 请求参数与请求体
//!
//! 查询参数沿用前端约定的 camelCase 命名，字段全部为 `Option`，
//! 缺失时由处理器返回对应的 400 提示；请求体沿用表列的 snake_case。

use content_engine::assistant::{DEFAULT_NUM_ITEMS, DEFAULT_NUM_QUESTIONS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{QuestionType, Role};

// ---- 查询参数 ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleQuery {
    pub module_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleLevelQuery {
    pub module_id: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleTypeQuery {
    pub module_id: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementQuery {
    pub user_id: Option<String>,
    pub module_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

// ---- 模块 ----

#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    pub instructor_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertModuleContentRequest {
    pub module_id: Uuid,
    pub level: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

// ---- 题目与作答 ----

fn default_item_type() -> String {
    "practice".to_string()
}

fn validate_question_type(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<QuestionType>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("question_type").with_message("question_type must be mcq or short".into()))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItemRequest {
    pub module_id: Uuid,
    pub level: String,
    #[serde(rename = "type", default = "default_item_type")]
    pub item_type: String,
    #[validate(custom(function = "validate_question_type"))]
    pub question_type: String,
    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,
    pub options: Option<Value>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

/// 单个题目或题目数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateItemsBody {
    Many(Vec<CreateItemRequest>),
    One(CreateItemRequest),
}

#[derive(Debug, Deserialize)]
pub struct CreateAttemptRequest {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub selected_answer: Option<String>,
    pub ai_feedback: Option<String>,
    pub is_correct: Option<bool>,
    /// 未提供 `ai_feedback` 时由模型生成
    #[serde(default)]
    pub request_feedback: bool,
    pub question: Option<String>,
    pub correct_answer: Option<String>,
}

// ---- 分级 ----

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertPlacementRequest {
    pub user_id: Uuid,
    pub module_id: Uuid,
    /// 缺省时按得分推导
    pub level: Option<String>,
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100"))]
    pub score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PretestAnswer {
    pub item_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PretestRequest {
    pub user_id: Uuid,
    pub module_id: Uuid,
    #[validate(length(min = 1, message = "No answers provided"))]
    pub answers: Vec<PretestAnswer>,
}

// ---- 用户档案 ----

fn validate_role(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Role>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("role").with_message("role must be student or instructor".into()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

// ---- AI ----

#[derive(Debug, Default, Deserialize)]
pub struct GeneratePromptRequest {
    #[serde(default)]
    pub prompt: String,
    pub model: Option<String>,
}

fn default_num_questions() -> u32 {
    DEFAULT_NUM_QUESTIONS
}

fn default_num_items() -> u32 {
    DEFAULT_NUM_ITEMS
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    #[validate(length(min = 1, message = "Topic is required"))]
    pub topic: String,
    pub level: String,
    #[serde(default = "default_num_questions")]
    #[validate(range(min = 1, max = 100, message = "numQuestions must be between 1 and 100"))]
    pub num_questions: u32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLearningMaterialsRequest {
    #[validate(length(min = 1, message = "Topic is required"))]
    pub topic: String,
    pub level: String,
    #[serde(default = "default_num_items")]
    #[validate(range(min = 1, max = 50, message = "numItems must be between 1 and 50"))]
    pub num_items: u32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFeedbackRequest {
    pub pre_test_score: f64,
    pub post_test_score: f64,
    #[validate(length(min = 1, message = "Topic is required"))]
    pub topic: String,
    pub level: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedbackRequest {
    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,
    pub correct_answer: String,
    pub student_answer: String,
}

// ---- 内容生成 ----

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateModuleRequest {
    #[validate(length(min = 1, message = "Module text is required"))]
    pub module_text: String,
    /// 指定时只生成该难度
    pub difficulty: Option<String>,
    /// serial 或 parallel，缺省使用配置
    pub mode: Option<String>,
    /// 是否写入 module_contents 与 items
    #[serde(default)]
    pub persist: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadModuleRequest {
    pub instructor_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Module text is required"))]
    pub module_text: String,
    pub mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use fake::faker::lorem::en::Sentence;
    use fake::faker::name::en::Name;
    use serde_json::json;

    #[test]
    fn test_create_module_validation() {
        let title: String = Sentence(2..5).fake();
        let request: CreateModuleRequest = serde_json::from_value(json!({
            "instructor_id": Uuid::new_v4(),
            "title": title,
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let request: CreateModuleRequest = serde_json::from_value(json!({
            "instructor_id": Uuid::new_v4(),
            "title": "",
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_items_body_accepts_single_and_array() {
        let item = json!({
            "module_id": Uuid::new_v4(),
            "level": "easy",
            "question_type": "mcq",
            "question": "2+2?",
            "options": ["3", "4"],
            "answer": "4"
        });

        let one: CreateItemsBody = serde_json::from_value(item.clone()).unwrap();
        match one {
            CreateItemsBody::One(req) => assert_eq!(req.item_type, "practice"),
            other => panic!("expected single item, got {:?}", other),
        }

        let many: CreateItemsBody = serde_json::from_value(json!([item.clone(), item])).unwrap();
        assert!(matches!(many, CreateItemsBody::Many(ref v) if v.len() == 2));

        let empty: CreateItemsBody = serde_json::from_value(json!([])).unwrap();
        assert!(matches!(empty, CreateItemsBody::Many(ref v) if v.is_empty()));
    }

    #[test]
    fn test_item_question_type_validation() {
        let request: CreateItemRequest = serde_json::from_value(json!({
            "module_id": Uuid::new_v4(),
            "level": "easy",
            "type": "pretest",
            "question_type": "essay",
            "question": "Explain."
        }))
        .unwrap();
        assert_eq!(request.item_type, "pretest");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_profile_role_validation() {
        let name: String = Name().fake();
        let request: UpdateProfileRequest = serde_json::from_value(json!({
            "full_name": name,
            "email": "student@example.com",
            "role": "student"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let request: UpdateProfileRequest =
            serde_json::from_value(json!({"role": "admin"})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_ai_request_defaults() {
        let request: GenerateQuestionsRequest =
            serde_json::from_value(json!({"topic": "Algebra", "level": "easy"})).unwrap();
        assert_eq!(request.num_questions, 30);

        let request: GenerateLearningMaterialsRequest =
            serde_json::from_value(json!({"topic": "Algebra", "level": "easy", "numItems": 3}))
                .unwrap();
        assert_eq!(request.num_items, 3);
    }

    #[test]
    fn test_query_uses_camel_case() {
        let query: ModuleTypeQuery =
            serde_json::from_value(json!({"moduleId": "m", "type": "pretest"})).unwrap();
        assert_eq!(query.module_id.as_deref(), Some("m"));
        assert_eq!(query.item_type.as_deref(), Some("pretest"));
        assert!(query.level.is_none());
    }

    #[test]
    fn test_pretest_requires_answers() {
        let request: PretestRequest = serde_json::from_value(json!({
            "user_id": Uuid::new_v4(),
            "module_id": Uuid::new_v4(),
            "answers": []
        }))
        .unwrap();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("No answers provided"));

        let request: PretestRequest = serde_json::from_value(json!({
            "user_id": Uuid::new_v4(),
            "module_id": Uuid::new_v4(),
            "answers": [{"item_id": Uuid::new_v4(), "answer": "4"}]
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }
}
