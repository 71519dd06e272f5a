//! Song repository
//!
//! Composes the query set and the transaction manager into the catalog
//! operations:
//! - create: group upsert + conditional song upsert in one transaction
//! - get/list: join with the group, soft-deleted rows on either side hidden
//! - update: read, merge, group upsert, write, all in one transaction
//! - delete: single conditional UPDATE, idempotent
//!
//! Conflicts are left to the database's unique indexes; nothing is
//! pre-checked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::{PgConnection, PgPool};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::db::error::{is_unique_violation, DbError};
use crate::db::queries::{self, CreateSongParams, ListSongParams, UpdateSongParams};
use crate::db::tx::TxManager;
use crate::models::filter::any_of;
use crate::models::{Pagination, Song, SongFilter, SongPatch};

/// Catalog operations as seen by the HTTP layer.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Create a song, creating or reusing its group.
    ///
    /// Replaying an identical song returns the existing ID.
    ///
    /// # Errors
    /// - `DbError::Duplicate` if a live song with the same name and group
    ///   exists with different content
    async fn create(&self, song: Song) -> Result<Song, DbError>;

    /// # Errors
    /// - `DbError::NotFound` if the song or its group is missing or soft-deleted
    async fn get_by_id(&self, id: Uuid) -> Result<Song, DbError>;

    /// Filtered, windowed listing. Empty result is not an error.
    async fn list(
        &self,
        filter: Option<&SongFilter>,
        page: Option<Pagination>,
    ) -> Result<Vec<Song>, DbError>;

    /// Merge `patch` onto the stored song and write it back.
    ///
    /// # Errors
    /// - `DbError::NotFound` if the song is missing or soft-deleted
    /// - `DbError::Duplicate` if the new name/group collides with another live song
    async fn update(&self, patch: SongPatch) -> Result<Song, DbError>;

    /// Soft-delete. A repeated call returns the original deletion time.
    ///
    /// # Errors
    /// - `DbError::NotFound` if no song has this ID
    async fn delete(&self, id: Uuid) -> Result<DateTime<Utc>, DbError>;
}

/// Postgres-backed song repository
#[derive(Debug, Clone)]
pub struct SongRepo {
    tx: TxManager,
}

impl SongRepo {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx: TxManager::new(pool),
        }
    }

    pub fn tx_manager(&self) -> &TxManager {
        &self.tx
    }

    /// Create within `scope`, or in a fresh transaction when `scope` is `None`.
    #[instrument(skip_all, fields(song = %song.name, group = %song.group))]
    pub async fn create_in(
        &self,
        scope: Option<&mut PgConnection>,
        song: Song,
    ) -> Result<Song, DbError> {
        self.tx
            .with_transaction(scope, move |conn| {
                Box::pin(async move {
                    let mut song = song;

                    let group_id = queries::create_group(&mut *conn, &song.group)
                        .await
                        .inspect_err(|e| warn!(error = %e, "execute query failed"))?;

                    let params = CreateSongParams {
                        name: song.name.clone(),
                        group_id,
                        release_date: song.release_date,
                        text: song.text.clone(),
                        link: song.link.clone(),
                    };

                    let id = queries::create_song(&mut *conn, &params)
                        .await
                        .inspect_err(|e| warn!(error = %e, "execute query failed"))?
                        .ok_or_else(|| DbError::duplicate(&song.name, &song.group))?;

                    song.id = id;
                    Ok::<_, DbError>(song)
                })
            })
            .await
    }

    #[instrument(skip(self, scope))]
    pub async fn get_by_id_in(
        &self,
        scope: Option<&mut PgConnection>,
        id: Uuid,
    ) -> Result<Song, DbError> {
        let mut conn = self.tx.executor_for(scope).await?;

        let row = queries::get_song_by_id(&mut *conn, id)
            .await
            .inspect_err(|e| warn!(error = %e, "execute query failed"))?;

        row.map(Song::from)
            .ok_or_else(|| DbError::not_found("song", id))
    }

    #[instrument(skip(self, scope))]
    pub async fn list_in(
        &self,
        scope: Option<&mut PgConnection>,
        filter: Option<&SongFilter>,
        page: Option<Pagination>,
    ) -> Result<Vec<Song>, DbError> {
        let mut params = ListSongParams::default();

        if let Some(filter) = filter {
            params.name = any_of(&filter.name);
            params.group = any_of(&filter.group);
            params.release_date_from = filter.release_date_from;
            params.release_date_to = filter.release_date_to;
            params.text = any_of(&filter.text);
            params.link = any_of(&filter.link);
        }

        if let Some(page) = page {
            params.limit = page.limit();
            params.offset = page.offset();
        }

        let mut conn = self.tx.executor_for(scope).await?;
        let mut rows = queries::list_songs(&mut *conn, params);

        let mut songs = Vec::new();
        while let Some(row) = rows
            .try_next()
            .await
            .inspect_err(|e| warn!(error = %e, "execute query failed"))?
        {
            songs.push(Song::from(row));
        }

        Ok(songs)
    }

    #[instrument(skip_all, fields(id = %patch.id))]
    pub async fn update_in(
        &self,
        scope: Option<&mut PgConnection>,
        patch: SongPatch,
    ) -> Result<Song, DbError> {
        self.tx
            .with_transaction(scope, move |conn| {
                Box::pin(async move {
                    let id = patch.id;

                    let stored = queries::get_song_by_id(&mut *conn, id)
                        .await
                        .inspect_err(|e| warn!(error = %e, "execute query failed"))?
                        .map(Song::from)
                        .ok_or_else(|| DbError::not_found("song", id))?;

                    let song = patch.apply_to(stored);

                    let group_id = queries::create_group(&mut *conn, &song.group)
                        .await
                        .inspect_err(|e| warn!(error = %e, "execute query failed"))?;

                    let params = UpdateSongParams {
                        id: song.id,
                        name: song.name.clone(),
                        group_id,
                        release_date: song.release_date,
                        text: song.text.clone(),
                        link: song.link.clone(),
                    };

                    match queries::update_song(&mut *conn, &params).await {
                        Ok(_) => Ok(song),
                        Err(e) if is_unique_violation(&e) => {
                            warn!(error = %e, "execute query failed");
                            Err(DbError::duplicate(&song.name, &song.group))
                        }
                        Err(e) => {
                            warn!(error = %e, "execute query failed");
                            Err(DbError::from(e))
                        }
                    }
                })
            })
            .await
    }

    #[instrument(skip(self, scope))]
    pub async fn delete_in(
        &self,
        scope: Option<&mut PgConnection>,
        id: Uuid,
    ) -> Result<DateTime<Utc>, DbError> {
        let mut conn = self.tx.executor_for(scope).await?;

        queries::delete_song(&mut *conn, id)
            .await
            .inspect_err(|e| warn!(error = %e, "execute query failed"))?
            .ok_or_else(|| DbError::not_found("song", id))
    }
}

#[async_trait]
impl SongRepository for SongRepo {
    async fn create(&self, song: Song) -> Result<Song, DbError> {
        self.create_in(None, song).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Song, DbError> {
        self.get_by_id_in(None, id).await
    }

    async fn list(
        &self,
        filter: Option<&SongFilter>,
        page: Option<Pagination>,
    ) -> Result<Vec<Song>, DbError> {
        self.list_in(None, filter, page).await
    }

    async fn update(&self, patch: SongPatch) -> Result<Song, DbError> {
        self.update_in(None, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<DateTime<Utc>, DbError> {
        self.delete_in(None, id).await
    }
}
