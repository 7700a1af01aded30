//! Category repository
//!
//! - list/get: LEFT JOIN on the link table for `device_count` (no N+1)
//! - delete: linked-devices check and delete in one transaction

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::PgPool;

use super::{CategoryStore, DbError};
use crate::models::{Category, CategoryName};

const LINKED_DEVICES: &str = "is linked to devices";

/// Category repository
#[derive(Clone)]
pub struct CategoryRepo {
    pool: PgPool,
}

impl CategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepo {
    async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, COUNT(dc.device_id) AS device_count
            FROM category c
            LEFT JOIN device_category dc ON dc.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn get(&self, id: i64) -> Result<Category, DbError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, COUNT(dc.device_id) AS device_count
            FROM category c
            LEFT JOIN device_category dc ON dc.category_id = c.id
            WHERE c.id = $1
            GROUP BY c.id, c.name
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "category",
            id,
        })
    }

    async fn create(&self, name: CategoryName) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO category (name) VALUES ($1) RETURNING id")
            .bind(name.as_str())
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id, name = name.as_str(), "category created");
        Ok(id)
    }

    async fn update(&self, id: i64, name: CategoryName) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE category SET name = $1 WHERE id = $2")
            .bind(name.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "category",
                id,
            });
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let linked: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM device_category WHERE category_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if linked > 0 {
            return Err(DbError::Conflict {
                resource: "category",
                id,
                reason: LINKED_DEVICES,
            });
        }

        // A link inserted after the count still trips the RESTRICT key
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e.as_database_error().map(|d| d.kind()) {
                Some(ErrorKind::ForeignKeyViolation) => DbError::Conflict {
                    resource: "category",
                    id,
                    reason: LINKED_DEVICES,
                },
                _ => DbError::Sqlx(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "category",
                id,
            });
        }

        tx.commit().await?;
        Ok(())
    }
}
