//! Parameterized statements against `groups` and `songs`
//!
//! Every function is generic over the sqlx executor, so it accepts a pool,
//! a pooled connection or a transaction's connection (`&mut *tx`).

use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::BoxStream;
use sqlx::{Executor, FromRow, Postgres};
use uuid::Uuid;

use crate::models::Song;

/// Insert a live group or return the ID of the live group with that name.
///
/// Never fails on conflict: the no-op `DO UPDATE` makes `RETURNING` yield
/// the existing row.
const CREATE_GROUP: &str = r#"
    INSERT INTO groups (name)
    VALUES ($1)
    ON CONFLICT (name) WHERE deleted_at IS NULL
    DO UPDATE SET name = EXCLUDED.name
    RETURNING id
"#;

/// Insert a song, or replay an identical one.
///
/// On a live `(name, group_id)` conflict the update only applies when
/// release date, text and link are identical, so:
/// fresh insert -> new id, identical replay -> existing id, differing content -> no row.
const CREATE_SONG: &str = r#"
    INSERT INTO songs (name, group_id, release_date, text, link)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (name, group_id) WHERE deleted_at IS NULL
    DO UPDATE
    SET
        release_date = EXCLUDED.release_date,
        text = EXCLUDED.text,
        link = EXCLUDED.link
    WHERE
        songs.release_date = EXCLUDED.release_date
        AND songs.text = EXCLUDED.text
        AND songs.link = EXCLUDED.link
    RETURNING id
"#;

const GET_SONG_BY_ID: &str = r#"
    SELECT
        s.id, s.name, s.group_id, g.name AS group_name,
        s.release_date, s.text, s.link
    FROM songs s
    JOIN groups g ON s.group_id = g.id
    WHERE
        s.id = $1
        AND s.deleted_at IS NULL
        AND g.deleted_at IS NULL
"#;

/// `NULL` parameters switch their condition off; `LIMIT NULL` is unbounded.
const LIST_SONGS: &str = r#"
    SELECT
        s.id, s.name, s.group_id, g.name AS group_name,
        s.release_date, s.text, s.link
    FROM songs s
    JOIN groups g ON s.group_id = g.id
    WHERE
        s.deleted_at IS NULL
        AND g.deleted_at IS NULL
        AND ($1::VARCHAR(255)[] IS NULL OR s.name = ANY($1::VARCHAR(255)[]))
        AND ($2::VARCHAR(255)[] IS NULL OR g.name = ANY($2::VARCHAR(255)[]))
        AND ($3::DATE IS NULL OR s.release_date >= $3::DATE)
        AND ($4::DATE IS NULL OR s.release_date <= $4::DATE)
        AND ($5::TEXT[] IS NULL OR s.text = ANY($5::TEXT[]))
        AND ($6::TEXT[] IS NULL OR s.link = ANY($6::TEXT[]))
    LIMIT $8
    OFFSET $7
"#;

const UPDATE_SONG: &str = r#"
    UPDATE songs
    SET
        name = $2,
        group_id = $3,
        release_date = $4,
        text = $5,
        link = $6
    WHERE id = $1
"#;

/// Set the marker only if it is not set yet, and hand back whichever value
/// the row ends up with.
const DELETE_SONG: &str = r#"
    UPDATE songs
    SET deleted_at = COALESCE(deleted_at, NOW())
    WHERE id = $1
    RETURNING deleted_at
"#;

/// Song joined with its group's name
#[derive(Debug, Clone, FromRow)]
pub struct SongRow {
    pub id: Uuid,
    pub name: String,
    pub group_id: Uuid,
    pub group_name: String,
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

impl From<SongRow> for Song {
    fn from(row: SongRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            group: row.group_name,
            release_date: row.release_date,
            text: row.text,
            link: row.link,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSongParams {
    pub name: String,
    pub group_id: Uuid,
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSongParams {
    pub id: Uuid,
    pub name: String,
    pub group_id: Uuid,
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

/// Bind values for [`list_songs`]; `None` disables a condition.
#[derive(Debug, Clone, Default)]
pub struct ListSongParams {
    pub name: Option<Vec<String>>,
    pub group: Option<Vec<String>>,
    pub release_date_from: Option<NaiveDate>,
    pub release_date_to: Option<NaiveDate>,
    pub text: Option<Vec<String>>,
    pub link: Option<Vec<String>>,
    pub offset: i64,
    pub limit: Option<i64>,
}

pub async fn create_group<'e, E>(executor: E, name: &str) -> Result<Uuid, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let (id,): (Uuid,) = sqlx::query_as(CREATE_GROUP)
        .bind(name)
        .fetch_one(executor)
        .await?;
    Ok(id)
}

/// `Ok(None)` signals a live row with the same key but different content.
pub async fn create_song<'e, E>(
    executor: E,
    params: &CreateSongParams,
) -> Result<Option<Uuid>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: Option<(Uuid,)> = sqlx::query_as(CREATE_SONG)
        .bind(&params.name)
        .bind(params.group_id)
        .bind(params.release_date)
        .bind(&params.text)
        .bind(&params.link)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|(id,)| id))
}

pub async fn get_song_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<SongRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, SongRow>(GET_SONG_BY_ID)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Lazy, single-pass cursor over matching songs.
pub fn list_songs<'e, 'c: 'e, E>(
    executor: E,
    params: ListSongParams,
) -> BoxStream<'e, Result<SongRow, sqlx::Error>>
where
    E: 'e + Executor<'c, Database = Postgres>,
{
    sqlx::query_as::<_, SongRow>(LIST_SONGS)
        .bind(params.name)
        .bind(params.group)
        .bind(params.release_date_from)
        .bind(params.release_date_to)
        .bind(params.text)
        .bind(params.link)
        .bind(params.offset)
        .bind(params.limit)
        .fetch(executor)
}

/// Returns the number of rows written (0 when the ID is unknown).
pub async fn update_song<'e, E>(executor: E, params: &UpdateSongParams) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(UPDATE_SONG)
        .bind(params.id)
        .bind(&params.name)
        .bind(params.group_id)
        .bind(params.release_date)
        .bind(&params.text)
        .bind(&params.link)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// `Ok(None)` when no row has this ID at all; otherwise the marker, which
/// is the original deletion time on a repeated call.
pub async fn delete_song<'e, E>(executor: E, id: Uuid) -> Result<Option<DateTime<Utc>>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: Option<(Option<DateTime<Utc>>,)> = sqlx::query_as(DELETE_SONG)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.and_then(|(deleted_at,)| deleted_at))
}
