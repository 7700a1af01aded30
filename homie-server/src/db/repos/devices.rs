//! Device repository
//!
//! Reads run two queries (device rows, then category links) and merge them
//! in memory keyed by device id. Writes run in one transaction each; the
//! category set is always replaced wholesale, never diffed.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};

use super::{DbError, DeviceStore};
use crate::models::{Device, DeviceCategory, DeviceDraft};

/// Device row without its categories
#[derive(Debug, Clone, FromRow)]
struct DeviceRow {
    id: i64,
    name: String,
    #[sqlx(rename = "type")]
    kind: String,
    power: f64,
    room: String,
    image: String,
}

/// One row of the link table joined with the category name
#[derive(Debug, Clone, FromRow)]
struct CategoryLink {
    device_id: i64,
    category_id: i64,
    category_name: String,
}

/// Device repository
#[derive(Clone)]
pub struct DeviceRepo {
    pool: PgPool,
}

impl DeviceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceStore for DeviceRepo {
    async fn list(&self) -> Result<Vec<Device>, DbError> {
        let rows = sqlx::query_as::<_, DeviceRow>(
            "SELECT id, name, type, power, room, image FROM devices ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let links = sqlx::query_as::<_, CategoryLink>(
            r#"
            SELECT dc.device_id, c.id AS category_id, c.name AS category_name
            FROM device_category dc
            JOIN category c ON c.id = dc.category_id
            ORDER BY dc.device_id, c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(attach_categories(rows, links))
    }

    async fn get(&self, id: i64) -> Result<Device, DbError> {
        let row = sqlx::query_as::<_, DeviceRow>(
            "SELECT id, name, type, power, room, image FROM devices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "device",
            id,
        })?;

        let links = sqlx::query_as::<_, CategoryLink>(
            r#"
            SELECT dc.device_id, c.id AS category_id, c.name AS category_name
            FROM device_category dc
            JOIN category c ON c.id = dc.category_id
            WHERE dc.device_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        attach_categories(vec![row], links)
            .pop()
            .ok_or(DbError::NotFound {
                resource: "device",
                id,
            })
    }

    async fn create(&self, draft: DeviceDraft) -> Result<i64, DbError> {
        let mut tx = self.pool.begin().await?;

        ensure_categories_exist(&mut tx, &draft.categories).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO devices (name, type, power, room, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.kind)
        .bind(draft.power)
        .bind(&draft.room)
        .bind(&draft.image)
        .fetch_one(&mut *tx)
        .await?;

        replace_categories(&mut tx, id, &draft.categories).await?;

        tx.commit().await?;
        tracing::debug!(id, categories = ?draft.categories, "device created");
        Ok(id)
    }

    async fn update(&self, id: i64, draft: DeviceDraft) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE devices
            SET name = $1, type = $2, power = $3, room = $4, image = $5
            WHERE id = $6
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.kind)
        .bind(draft.power)
        .bind(&draft.room)
        .bind(&draft.image)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "device",
                id,
            });
        }

        ensure_categories_exist(&mut tx, &draft.categories).await?;
        replace_categories(&mut tx, id, &draft.categories).await?;

        tx.commit().await?;
        tracing::debug!(id, categories = ?draft.categories, "device updated");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM device_category WHERE device_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "device",
                id,
            });
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Reject ids that do not name an existing category.
async fn ensure_categories_exist(conn: &mut PgConnection, ids: &[i64]) -> Result<(), DbError> {
    let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM category WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    let missing: Vec<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DbError::UnknownCategories(missing))
    }
}

/// Full replace of a device's category set: one delete, one batched insert.
async fn replace_categories(
    conn: &mut PgConnection,
    device_id: i64,
    category_ids: &[i64],
) -> Result<(), DbError> {
    sqlx::query("DELETE FROM device_category WHERE device_id = $1")
        .bind(device_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO device_category (device_id, category_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(device_id)
    .bind(category_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Merge link rows into their devices.
///
/// Links are grouped by device id; within a device they keep the order the
/// query returned them in. Devices keep their own order.
fn attach_categories(rows: Vec<DeviceRow>, links: Vec<CategoryLink>) -> Vec<Device> {
    let mut by_device: HashMap<i64, Vec<DeviceCategory>> = HashMap::new();
    for link in links {
        by_device
            .entry(link.device_id)
            .or_default()
            .push(DeviceCategory {
                id: link.category_id,
                name: link.category_name,
            });
    }

    rows.into_iter()
        .map(|row| Device {
            categories: by_device.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
            kind: row.kind,
            power: row.power,
            room: row.room,
            image: row.image,
        })
        .collect()
}
