//! 内容生成测试套件
//!
//! 需要服务端配置可用的 Ollama 模型。

use crate::setup::TestEnvironment;

#[cfg(test)]
mod generation_tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    const MODULE_TEXT: &str = "Photosynthesis is the process by which green plants convert light \
        energy into chemical energy. Chlorophyll absorbs light, water is split to release oxygen, \
        and carbon dioxide is fixed into glucose through the Calvin cycle.";

    #[tokio::test]
    #[ignore = "需要运行服务与 Ollama"]
    async fn test_upload_generates_all_levels() {
        let env = TestEnvironment::setup().await.unwrap();

        let result = env
            .api
            .upload_module(&json!({
                "instructor_id": env.config.instructor_id,
                "title": "Photosynthesis",
                "module_text": MODULE_TEXT,
                "mode": "serial"
            }))
            .await
            .unwrap();

        let module_id: Uuid = result["module"]["id"].as_str().unwrap().parse().unwrap();
        env.track_module(module_id);

        assert_eq!(result["contents"].as_array().unwrap().len(), 3);
        let items = result["items"].as_array().unwrap();
        assert_eq!(env.db.count_items(module_id).await.unwrap(), items.len() as i64);

        let status = env.api.generation_status(module_id).await.unwrap();
        // 入库后内存中的生成状态已释放
        assert_eq!(status["complete"], false);

        env.cleanup().await.unwrap();
    }
}
