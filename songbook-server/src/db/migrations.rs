//! Schema for the song catalog
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so `run` is safe on
//! every startup.

use sqlx::PgPool;

/// Create `groups` and `songs` with their partial unique indexes.
///
/// Uniqueness only binds live rows, so a soft-deleted song or group never
/// blocks re-creating the same name.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("running song catalog migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS groups (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            deleted_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            group_id UUID NOT NULL REFERENCES groups(id),
            release_date DATE NOT NULL,
            text TEXT NOT NULL,
            link TEXT NOT NULL,
            deleted_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Arbiters for the ON CONFLICT ... WHERE deleted_at IS NULL clauses
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS groups_live_name_idx ON groups(name) WHERE deleted_at IS NULL",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS songs_live_name_group_idx ON songs(name, group_id) WHERE deleted_at IS NULL",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS songs_release_date_idx ON songs(release_date)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS songs_group_id_idx ON songs(group_id)")
        .execute(pool)
        .await?;

    tracing::info!("song catalog migrations complete");
    Ok(())
}
