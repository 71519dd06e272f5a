//! Song catalog endpoints
//!
//! | Method | Path          | Operation                               |
//! |--------|---------------|-----------------------------------------|
//! | POST   | /songs        | metadata lookup, then create            |
//! | GET    | /songs        | filtered, windowed listing              |
//! | GET    | /songs/{id}   | single song, lyrics windowed by verse   |
//! | PUT    | /songs/{id}   | full update                             |
//! | PATCH  | /songs/{id}   | partial update                          |
//! | DELETE | /songs/{id}   | soft delete                             |

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::ValidUuid;
use crate::http::server::AppState;
use crate::models::validation::{optional_text, require_text};
use crate::models::{
    paginate_verses, Pagination, PaginationParams, Song, SongFilter, SongPatch, MAX_NAME_LEN,
};

/// Lyrics and links have no column limit.
const UNBOUNDED: usize = usize::MAX;

/// POST /songs body
#[derive(Debug, Deserialize)]
pub struct CreateSongRequest {
    pub group: String,
    pub song: String,
}

impl CreateSongRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("group", &self.group, MAX_NAME_LEN)?;
        require_text("song", &self.song, MAX_NAME_LEN)?;
        Ok(())
    }
}

/// PUT /songs/{id} body: every field required
#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    #[serde(rename = "song")]
    pub name: String,
    pub group: String,
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

impl UpdateSongRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("song", &self.name, MAX_NAME_LEN)?;
        require_text("group", &self.group, MAX_NAME_LEN)?;
        require_text("text", &self.text, UNBOUNDED)?;
        require_text("link", &self.link, UNBOUNDED)?;
        Ok(())
    }
}

/// PATCH /songs/{id} body: absent or empty fields keep the stored value
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialUpdateSongRequest {
    #[serde(rename = "song")]
    pub name: Option<String>,
    pub group: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl PartialUpdateSongRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            optional_text("song", name, MAX_NAME_LEN)?;
        }
        if let Some(group) = &self.group {
            optional_text("group", group, MAX_NAME_LEN)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SongResponse {
    pub song: Song,
}

#[derive(Debug, Serialize)]
pub struct SongListResponse {
    pub song_list: Vec<Song>,
}

#[derive(Debug, Serialize)]
pub struct DeleteSongResponse {
    pub deleted_time: DateTime<Utc>,
}

/// POST /songs - look up metadata and add the song
async fn create_song(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSongRequest>, JsonRejection>,
) -> Result<Json<SongResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let info = state.music_info.info(&req.group, &req.song).await?;

    let song = Song::new(req.song, req.group, info.release_date, info.text, info.link);
    let created = state.songs.create(song).await?;

    tracing::info!(id = %created.id, song = %created.name, group = %created.group, "song created");
    Ok(Json(SongResponse { song: created }))
}

/// GET /songs - filter with repeated keys (`?group=a&group=b`), window with limit/offset
async fn list_songs(
    State(state): State<Arc<AppState>>,
    filter: Result<axum_extra::extract::Query<SongFilter>, axum_extra::extract::QueryRejection>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<SongListResponse>, ApiError> {
    let axum_extra::extract::Query(filter) = filter?;
    let Query(params) = params?;
    let page = Pagination::from(params);

    let filter = (!filter.is_empty()).then_some(&filter);
    let songs = state.songs.list(filter, Some(page)).await?;

    Ok(Json(SongListResponse { song_list: songs }))
}

/// GET /songs/{id} - limit/offset select verses of the lyrics
async fn get_song(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<SongResponse>, ApiError> {
    let Query(params) = params?;

    let mut song = state.songs.get_by_id(id).await?;
    song.text = paginate_verses(&song.text, Pagination::from(params));

    Ok(Json(SongResponse { song }))
}

/// PUT /songs/{id} - replace every field
async fn update_song(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    payload: Result<Json<UpdateSongRequest>, JsonRejection>,
) -> Result<Json<SongResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let mut song = Song::new(req.name, req.group, req.release_date, req.text, req.link);
    song.id = id;

    let updated = state.songs.update(SongPatch::full(song)).await?;
    Ok(Json(SongResponse { song: updated }))
}

/// PATCH /songs/{id} - merge the given fields onto the stored song
async fn partial_update_song(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    payload: Result<Json<PartialUpdateSongRequest>, JsonRejection>,
) -> Result<Json<SongResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let patch = SongPatch {
        id,
        name: req.name,
        group: req.group,
        release_date: req.release_date,
        text: req.text,
        link: req.link,
    };

    let updated = state.songs.update(patch).await?;
    Ok(Json(SongResponse { song: updated }))
}

/// DELETE /songs/{id} - soft delete, repeatable
async fn delete_song(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<DeleteSongResponse>, ApiError> {
    let deleted_time = state.songs.delete(id).await?;
    Ok(Json(DeleteSongResponse { deleted_time }))
}

/// Song routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/songs", get(list_songs).post(create_song))
        .route(
            "/songs/{id}",
            get(get_song)
                .put(update_song)
                .patch(partial_update_song)
                .delete(delete_song),
        )
}
