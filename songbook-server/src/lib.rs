//! songbook-server: song catalog over Postgres, exposed through HTTP
//!
//! Layers, bottom-up:
//! - `models`: song, filter, pagination and verse windowing
//! - `db`: pool, schema, transaction manager, queries and the song repository
//! - `client`: music metadata service lookup
//! - `http`: axum routes, error mapping, server lifecycle

pub mod client;
pub mod db;
pub mod http;
pub mod models;

pub use client::{MusicInfoClient, MusicInfoError, SongInfo, SongInfoSource};
pub use db::{create_pool, DbError, SongRepo, SongRepository, TxManager};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use models::{Pagination, Song, SongFilter, SongPatch};
