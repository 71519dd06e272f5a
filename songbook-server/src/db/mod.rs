//! Database layer - connection pool, schema, transactions and the song repository
//!
//! # Design Principles
//!
//! - Connection pool with a bounded acquire wait - no Arc<Mutex<Connection>>
//! - Reads JOIN songs with groups - no N+1 queries
//! - Rely on partial unique indexes, handle conflicts - no check-then-insert
//! - Multi-step writes run in one transaction, passed down explicitly

pub mod error;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod repos;
pub mod tx;

pub use error::DbError;
pub use pool::{connect, create_pool, create_pool_with_options, PoolSettings};
pub use repos::*;
pub use tx::{Conn, TxManager};
