//! 模块与分级正文测试套件

use crate::helpers::*;
use crate::setup::TestEnvironment;

#[cfg(test)]
mod module_tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_create_and_fetch_module() {
        let env = TestEnvironment::setup().await.unwrap();

        let req = CreateModuleRequest {
            instructor_id: env.config.instructor_id,
            title: format!("E2E Module {}", Uuid::new_v4()),
            description: Some("Created by e2e".into()),
        };
        let module = env.api.create_module(&req).await.unwrap();
        env.track_module(module.id);
        assert_eq!(module.title, req.title);

        let fetched = env.api.get_module(module.id).await.unwrap();
        assert_eq!(fetched.id, module.id);

        let all = env.api.list_modules().await.unwrap();
        assert!(all.iter().any(|m| m.id == module.id));

        env.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_content_upsert_and_hard_alias() {
        let env = TestEnvironment::setup().await.unwrap();
        let module = env
            .api
            .create_module(&CreateModuleRequest {
                instructor_id: env.config.instructor_id,
                title: "E2E Content".into(),
                description: None,
            })
            .await
            .unwrap();
        env.track_module(module.id);

        env.api.upsert_content(module.id, "hard", "first version").await.unwrap();
        let updated = env.api.upsert_content(module.id, "high", "second version").await.unwrap();
        assert_eq!(updated.level, "high");
        assert_eq!(updated.content, "second version");

        let fetched = env.api.get_content(module.id, "hard").await.unwrap();
        assert_eq!(fetched.content, "second version");
        assert_eq!(env.api.list_contents(module.id).await.unwrap().len(), 1);

        env.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_missing_content_returns_404() {
        let env = TestEnvironment::setup().await.unwrap();
        let (status, body) = env
            .api
            .get_error(&format!("/api/modules/content/get?moduleId={}&level=easy", Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(status.as_u16(), 404);
        assert_eq!(body.error, "Module content not found");
        assert_eq!(body.code, "NOT_FOUND");
    }
}
