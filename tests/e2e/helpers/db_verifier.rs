//! 数据库验证工具
//!
//! 直接查询数据库，验证接口写入的结果。

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub struct DbVerifier {
    pool: PgPool,
}

impl DbVerifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_items(&self, module_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items WHERE module_id = $1")
            .bind(module_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn count_attempts(&self, user_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attempts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn placement_level(&self, user_id: Uuid, module_id: Uuid) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT level FROM placements WHERE user_id = $1 AND module_id = $2",
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// 删除测试模块及其关联数据
    pub async fn delete_module(&self, module_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM attempts WHERE item_id IN (SELECT id FROM items WHERE module_id = $1)")
            .bind(module_id)
            .execute(&mut *tx)
            .await?;
        for table in ["items", "module_contents", "placements"] {
            sqlx::query(&format!("DELETE FROM {} WHERE module_id = $1", table))
                .bind(module_id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(module_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
