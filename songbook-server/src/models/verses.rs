//! Verse windowing for single-song reads

use super::Pagination;

/// Verses are separated by exactly one blank line.
pub const VERSE_DELIMITER: &str = "\n\n";

/// Slice `text` down to the verse window described by `page`.
///
/// - offset at or past the verse count yields an empty string
/// - a non-positive limit, or one covering the rest, returns every remaining verse
pub fn paginate_verses(text: &str, page: Pagination) -> String {
    let verses: Vec<&str> = text.split(VERSE_DELIMITER).collect();
    let offset = page.offset.max(0) as usize;

    if offset >= verses.len() {
        return String::new();
    }

    let remaining = &verses[offset..];
    let limit = page.limit;

    if limit <= 0 || limit as usize >= remaining.len() {
        return remaining.join(VERSE_DELIMITER);
    }

    remaining[..limit as usize].join(VERSE_DELIMITER)
}
