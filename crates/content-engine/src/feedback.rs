//! 作答反馈与测评反馈

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::extract::{extract_json_object, parse_lenient};
use crate::llm::{GenerateRequest, LlmClient};
use crate::prompt::{answer_feedback_prompt, performance_feedback_prompt, truncate_chars};

/// 模型不可用或输出为空时返回给学生的提示
pub const FEEDBACK_UNAVAILABLE: &str = "AI feedback is not available at this time.";

/// 前后测对比反馈
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceFeedback {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// 反馈服务
#[derive(Clone)]
pub struct FeedbackService {
    llm: Arc<dyn LlmClient>,
    /// 单题反馈模型与温度
    answer_model: String,
    answer_temperature: f32,
    /// 测评反馈模型与温度
    performance_model: String,
    performance_temperature: f32,
}

impl FeedbackService {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        answer_model: impl Into<String>,
        answer_temperature: f32,
        performance_model: impl Into<String>,
        performance_temperature: f32,
    ) -> Self {
        Self {
            llm,
            answer_model: answer_model.into(),
            answer_temperature,
            performance_model: performance_model.into(),
            performance_temperature,
        }
    }

    /// 单题形成性反馈
    ///
    /// 永不失败：模型调用出错或返回空文本时给出固定提示。
    pub async fn answer_feedback(
        &self,
        question: &str,
        correct_answer: &str,
        student_answer: &str,
    ) -> String {
        let request = GenerateRequest::new(
            self.answer_model.clone(),
            answer_feedback_prompt(question, correct_answer, student_answer),
        )
        .with_temperature(self.answer_temperature)
        .with_kind("answer_feedback");

        match self.llm.generate(request).await {
            Ok(output) if !output.response.trim().is_empty() => {
                debug!(preview = %truncate_chars(&output.response, 100), "answer feedback generated");
                output.response
            }
            Ok(_) => FEEDBACK_UNAVAILABLE.to_string(),
            Err(e) => {
                warn!(error = %e, "Error getting feedback from model");
                FEEDBACK_UNAVAILABLE.to_string()
            }
        }
    }

    /// 前后测对比反馈，输出需为 JSON 对象
    pub async fn performance_feedback(
        &self,
        pre_test_score: f64,
        post_test_score: f64,
        topic: &str,
        level: &str,
    ) -> Result<PerformanceFeedback> {
        let request = GenerateRequest::new(
            self.performance_model.clone(),
            performance_feedback_prompt(pre_test_score, post_test_score, topic, level),
        )
        .with_temperature(self.performance_temperature)
        .with_kind("performance_feedback");

        let output = self.llm.generate(request).await?;
        let json = extract_json_object(&output.response)?;
        let value = parse_lenient(&json)?;
        Ok(serde_json::from_value(value)?)
    }
}
