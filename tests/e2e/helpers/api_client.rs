//! REST API 客户端
//!
//! 封装对 learning-api 的 HTTP 调用。

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// API 错误响应
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

/// API 客户端
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // 内容生成可能需要数分钟
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/ready")).send().await?;
        let body: Value = resp.json().await?;
        Ok(body["status"] == "ok")
    }

    // ========== 模块 API ==========

    pub async fn create_module(&self, req: &CreateModuleRequest) -> Result<ModuleResponse> {
        self.post("/api/modules", req).await
    }

    pub async fn list_modules(&self) -> Result<Vec<ModuleResponse>> {
        self.get("/api/modules").await
    }

    pub async fn get_module(&self, id: Uuid) -> Result<ModuleResponse> {
        self.get(&format!("/api/modules/{}", id)).await
    }

    pub async fn upsert_content(&self, module_id: Uuid, level: &str, content: &str) -> Result<ModuleContentResponse> {
        self.post(
            "/api/modules/content",
            &serde_json::json!({"module_id": module_id, "level": level, "content": content}),
        )
        .await
    }

    pub async fn get_content(&self, module_id: Uuid, level: &str) -> Result<ModuleContentResponse> {
        self.get(&format!("/api/modules/content/get?moduleId={}&level={}", module_id, level))
            .await
    }

    pub async fn list_contents(&self, module_id: Uuid) -> Result<Vec<ModuleContentResponse>> {
        self.get(&format!("/api/modules/content/all?moduleId={}", module_id)).await
    }

    // ========== 题目与作答 API ==========

    pub async fn create_items(&self, items: &[Value]) -> Result<Vec<ItemResponse>> {
        self.post("/api/items", &items).await
    }

    pub async fn items_by_type(&self, module_id: Uuid, item_type: &str) -> Result<Vec<ItemResponse>> {
        self.get(&format!("/api/items/by-module-type?moduleId={}&type={}", module_id, item_type))
            .await
    }

    pub async fn create_attempt(&self, body: &Value) -> Result<Value> {
        self.post("/api/attempts", body).await
    }

    // ========== 分级 API ==========

    pub async fn submit_pretest(&self, body: &Value) -> Result<Value> {
        self.post("/api/placements/pretest", body).await
    }

    pub async fn get_placement(&self, user_id: Uuid, module_id: Uuid) -> Result<Value> {
        self.get(&format!("/api/placements?userId={}&moduleId={}", user_id, module_id))
            .await
    }

    // ========== 内容生成 API ==========

    pub async fn upload_module(&self, body: &Value) -> Result<Value> {
        self.post("/api/modules/upload", body).await
    }

    pub async fn generation_status(&self, module_id: Uuid) -> Result<Value> {
        self.get(&format!("/api/modules/{}/generation", module_id)).await
    }

    /// 发送请求并返回状态码与错误体，用于验证错误路径
    pub async fn get_error(&self, path: &str) -> Result<(StatusCode, ErrorBody)> {
        let resp = self.client.get(self.url(path)).send().await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.client.get(self.url(path)).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, R: Serialize + ?Sized>(&self, path: &str, body: &R) -> Result<T> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        self.handle_response(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: DeserializeOwned>(&self, resp: Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            let error_text = resp.text().await.unwrap_or_default();
            Err(anyhow::anyhow!("API 错误 {}: {}", status, error_text))
        }
    }
}

// ========== 请求/响应类型 ==========

#[derive(Debug, Clone, Serialize)]
pub struct CreateModuleRequest {
    pub instructor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleResponse {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleContentResponse {
    pub id: Uuid,
    pub module_id: Uuid,
    pub level: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub module_id: Uuid,
    pub level: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub question_type: String,
    pub question: String,
    pub answer: Option<String>,
}
