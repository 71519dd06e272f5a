//! Domain models and request value objects
//!
//! Request input is validated in the HTTP layer before it reaches these
//! types. Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod song;
pub mod filter;
pub mod pagination;
pub mod verses;

pub use validation::ValidationError;
pub use song::{Song, SongPatch, MAX_NAME_LEN};
pub use filter::SongFilter;
pub use pagination::{Pagination, PaginationParams};
pub use verses::{paginate_verses, VERSE_DELIMITER};
