//! Music metadata service client
//!
//! `POST /songs` only carries a group and a song name; release date, lyrics
//! and link come from `GET {address}/info?group=..&song=..`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;

/// Default request timeout for metadata lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Song details returned by the metadata service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SongInfo {
    #[serde(rename = "releaseDate")]
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

/// Metadata lookup errors
#[derive(Debug, thiserror::Error)]
pub enum MusicInfoError {
    /// The service answered with something other than 200; the status is
    /// forwarded to our own caller.
    #[error("music service responded with {status}: {body}")]
    Status { status: u16, body: String },

    /// Connect, timeout or decode failure
    #[error("music service request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Where song metadata comes from
#[async_trait]
pub trait SongInfoSource: Send + Sync {
    async fn info(&self, group: &str, song: &str) -> Result<SongInfo, MusicInfoError>;
}

/// HTTP client for the metadata service
#[derive(Debug, Clone)]
pub struct MusicInfoClient {
    http: reqwest::Client,
    base_url: String,
}

impl MusicInfoClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8081`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MusicInfoError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SongInfoSource for MusicInfoClient {
    #[tracing::instrument(skip(self))]
    async fn info(&self, group: &str, song: &str) -> Result<SongInfo, MusicInfoError> {
        let response = self
            .http
            .get(format!("{}/info", self.base_url))
            .query(&[("group", group), ("song", song)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            tracing::debug!(status = status.as_u16(), "music service rejected lookup");
            return Err(MusicInfoError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<SongInfo>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn info_stub(Query(params): Query<HashMap<String, String>>) -> (AxumStatus, Json<Value>) {
        match params.get("song").map(String::as_str) {
            Some("Supermassive Black Hole") => (
                AxumStatus::OK,
                Json(json!({
                    "releaseDate": "2006-07-16",
                    "text": "Ooh baby, don't you know I suffer?\n\nOoh baby, can you hear me moan?",
                    "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw",
                    "group": params.get("group"),
                })),
            ),
            _ => (AxumStatus::BAD_REQUEST, Json(json!("unknown song"))),
        }
    }

    async fn spawn_stub() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/info", get(info_stub));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = MusicInfoClient::new("http://localhost:8081/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8081");
    }

    #[test]
    fn decodes_camel_case_release_date() {
        let info: SongInfo = serde_json::from_str(
            r#"{"releaseDate":"2006-07-16","text":"verse","link":"https://example.com"}"#,
        )
        .unwrap();
        assert_eq!(info.release_date, NaiveDate::from_ymd_opt(2006, 7, 16).unwrap());
    }

    #[tokio::test]
    async fn fetches_song_info() {
        let client = MusicInfoClient::new(spawn_stub().await, DEFAULT_TIMEOUT).unwrap();

        let info = client.info("Muse", "Supermassive Black Hole").await.unwrap();
        assert_eq!(info.release_date, NaiveDate::from_ymd_opt(2006, 7, 16).unwrap());
        assert_eq!(info.link, "https://www.youtube.com/watch?v=Xsp3_a-PMTw");
    }

    #[tokio::test]
    async fn non_ok_status_is_forwarded() {
        let client = MusicInfoClient::new(spawn_stub().await, DEFAULT_TIMEOUT).unwrap();

        let err = client.info("Muse", "Unknown").await.unwrap_err();
        match err {
            MusicInfoError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("unknown song"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let client =
            MusicInfoClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        let err = client.info("Muse", "Uprising").await.unwrap_err();
        assert!(matches!(err, MusicInfoError::Transport(_)));
    }
}
