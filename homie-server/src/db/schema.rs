//! Catalog tables
//!
//! Idempotent bootstrap only: every statement is `IF NOT EXISTS`, there is
//! no migration history.

use sqlx::PgPool;

/// Create the catalog tables and indexes if they are missing.
pub async fn ensure(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring catalog schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS category (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS devices (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            power DOUBLE PRECISION NOT NULL,
            room TEXT NOT NULL,
            image TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // RESTRICT backs up the linked-devices check in CategoryRepo::delete
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS device_category (
            device_id BIGINT NOT NULL REFERENCES devices(id) ON DELETE CASCADE,
            category_id BIGINT NOT NULL REFERENCES category(id) ON DELETE RESTRICT,
            PRIMARY KEY (device_id, category_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_device_category_category ON device_category(category_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Catalog schema ready");
    Ok(())
}
