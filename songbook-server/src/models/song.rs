//! Song catalog entry and the update patch merged into it

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length for song and group names (`VARCHAR(255)` columns)
pub const MAX_NAME_LEN: usize = 255;

/// A song as seen by callers: the group is carried by name, not by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: Uuid,
    #[serde(rename = "song")]
    pub name: String,
    pub group: String,
    pub release_date: NaiveDate,
    /// Full lyric body, verses separated by a blank line
    pub text: String,
    pub link: String,
}

impl Song {
    /// Build a song that has not been persisted yet (nil ID).
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        release_date: NaiveDate,
        text: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            group: group.into(),
            release_date,
            text: text.into(),
            link: link.into(),
        }
    }
}

/// Changes to apply to a stored song.
///
/// Full and partial updates share this type: a full update sets every field.
/// A field that is `None` or an empty string keeps the stored value, so a
/// patch can never clear a column to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongPatch {
    pub id: Uuid,
    pub name: Option<String>,
    pub group: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl SongPatch {
    /// Patch that replaces every field with the values of `song`.
    pub fn full(song: Song) -> Self {
        Self {
            id: song.id,
            name: Some(song.name),
            group: Some(song.group),
            release_date: Some(song.release_date),
            text: Some(song.text),
            link: Some(song.link),
        }
    }

    /// Merge onto the stored row. The stored ID always wins.
    pub fn apply_to(self, stored: Song) -> Song {
        Song {
            id: stored.id,
            name: keep_or_replace(self.name, stored.name),
            group: keep_or_replace(self.group, stored.group),
            release_date: self.release_date.unwrap_or(stored.release_date),
            text: keep_or_replace(self.text, stored.text),
            link: keep_or_replace(self.link, stored.link),
        }
    }
}

fn keep_or_replace(incoming: Option<String>, stored: String) -> String {
    match incoming {
        Some(value) if !value.is_empty() => value,
        _ => stored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Song {
        Song {
            id: Uuid::new_v4(),
            name: "song-name".into(),
            group: "song-group".into(),
            release_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            text: "song-text".into(),
            link: "song-link".into(),
        }
    }

    #[test]
    fn partial_patch_keeps_unset_fields() {
        let before = stored();
        let patch = SongPatch {
            id: before.id,
            group: Some("new-song-group".into()),
            text: Some("new-song-text".into()),
            ..Default::default()
        };

        let after = patch.apply_to(before.clone());

        assert_eq!(after.name, before.name);
        assert_eq!(after.release_date, before.release_date);
        assert_eq!(after.link, before.link);
        assert_eq!(after.group, "new-song-group");
        assert_eq!(after.text, "new-song-text");
    }

    #[test]
    fn empty_string_keeps_stored_value() {
        let before = stored();
        let patch = SongPatch {
            id: before.id,
            name: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(patch.apply_to(before.clone()).name, before.name);
    }

    #[test]
    fn full_patch_replaces_everything_but_id() {
        let before = stored();
        let mut incoming = Song::new(
            "new-song-name",
            "new-song-group",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "new-song-text",
            "new-song-link",
        );
        incoming.id = Uuid::new_v4();

        let after = SongPatch::full(incoming.clone()).apply_to(before.clone());

        assert_eq!(after.id, before.id);
        assert_eq!(after.name, incoming.name);
        assert_eq!(after.group, incoming.group);
        assert_eq!(after.release_date, incoming.release_date);
        assert_eq!(after.text, incoming.text);
        assert_eq!(after.link, incoming.link);
    }

    #[test]
    fn serializes_name_as_song() {
        let json = serde_json::to_value(stored()).unwrap();
        assert_eq!(json["song"], "song-name");
        assert_eq!(json["release_date"], "2025-01-01");
        assert!(json.get("name").is_none());
    }
}
