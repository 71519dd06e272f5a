//! Outbound clients

pub mod music_info;

pub use music_info::{MusicInfoClient, MusicInfoError, SongInfo, SongInfoSource};
