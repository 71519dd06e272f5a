//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs for reads (no N+1)
//! - Handles conflicts via ON CONFLICT and unique indexes (no check-then-insert)
//! - Uses transactions for multi-step operations

pub mod songs;

pub use songs::{SongRepo, SongRepository};
