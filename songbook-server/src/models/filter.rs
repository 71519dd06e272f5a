//! Song list filter

use chrono::NaiveDate;
use serde::Deserialize;

/// Conditions applied by song listing, combined with AND.
///
/// An empty set or an absent bound imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SongFilter {
    /// Song names (any of)
    #[serde(rename = "song")]
    pub name: Vec<String>,
    /// Group names (any of)
    pub group: Vec<String>,
    /// Inclusive lower release date bound
    pub release_date_from: Option<NaiveDate>,
    /// Inclusive upper release date bound
    pub release_date_to: Option<NaiveDate>,
    /// Exact lyric bodies (any of)
    pub text: Vec<String>,
    /// Links (any of)
    pub link: Vec<String>,
}

impl SongFilter {
    /// True when no field constrains the result.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.group.is_empty()
            && self.release_date_from.is_none()
            && self.release_date_to.is_none()
            && self.text.is_empty()
            && self.link.is_empty()
    }
}

/// Bind shape for a set filter: `NULL` disables the `= ANY(...)` condition.
pub(crate) fn any_of(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(SongFilter::default().is_empty());

        let filter = SongFilter {
            group: vec!["group-1".into()],
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }

    #[test]
    fn empty_set_binds_null() {
        assert_eq!(any_of(&[]), None);
        assert_eq!(
            any_of(&["a".to_string(), "b".to_string()]),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn deserializes_with_song_key() {
        let filter: SongFilter = serde_json::from_value(serde_json::json!({
            "song": ["one"],
            "release_date_from": "2020-01-01"
        }))
        .unwrap();

        assert_eq!(filter.name, vec!["one".to_string()]);
        assert_eq!(
            filter.release_date_from,
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert!(filter.group.is_empty());
    }
}
