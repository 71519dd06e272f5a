//! Transaction manager
//!
//! A transaction in progress is passed down the call chain explicitly as
//! `Option<&mut PgConnection>` (the "scope"). `None` means no transaction is
//! open. Every statement goes through [`TxManager::executor_for`], so a query
//! is written once and runs the same inside or outside a transaction.
//!
//! Nesting is flat: `with_transaction` on a scope that already holds a
//! transaction reuses it and leaves commit/rollback to whoever opened it.
//!
//! Cancellation: dropping the future returned by `with_transaction` drops the
//! `sqlx::Transaction`, which rolls back. Nothing is committed partially.

use std::ops::{Deref, DerefMut};

use futures::future::BoxFuture;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};

/// Connection a statement runs on: borrowed from an open transaction, or
/// checked out of the pool for this call only.
pub enum Conn<'a> {
    Pooled(PoolConnection<Postgres>),
    Scoped(&'a mut PgConnection),
}

impl Deref for Conn<'_> {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        match self {
            Self::Pooled(conn) => &**conn,
            Self::Scoped(conn) => &**conn,
        }
    }
}

impl DerefMut for Conn<'_> {
    fn deref_mut(&mut self) -> &mut PgConnection {
        match self {
            Self::Pooled(conn) => &mut **conn,
            Self::Scoped(conn) => &mut **conn,
        }
    }
}

impl Conn<'_> {
    /// Whether this connection belongs to a transaction opened by a caller.
    pub fn is_scoped(&self) -> bool {
        matches!(self, Self::Scoped(_))
    }
}

/// Opens, reuses and finishes transactions over a shared pool.
#[derive(Debug, Clone)]
pub struct TxManager {
    pool: PgPool,
}

impl TxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The single dispatch point between "inside a transaction" and "bare pool".
    ///
    /// Pool acquisition failure (timeout, closed pool) is returned as-is; it
    /// is a transient condition, not a domain one.
    pub async fn executor_for<'a>(
        &self,
        scope: Option<&'a mut PgConnection>,
    ) -> Result<Conn<'a>, sqlx::Error> {
        match scope {
            Some(conn) => Ok(Conn::Scoped(conn)),
            None => Ok(Conn::Pooled(self.pool.acquire().await?)),
        }
    }

    /// Run `op` inside a transaction.
    ///
    /// With `scope == None` a new transaction is opened, committed when `op`
    /// returns `Ok`, and rolled back when it returns `Err`; the error from
    /// `op` is returned unchanged. With `Some(conn)` the caller's transaction
    /// is reused and not finished here.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let id = tx_manager
    ///     .with_transaction(None, move |conn| {
    ///         Box::pin(async move { queries::create_group(conn, &group).await.map_err(DbError::from) })
    ///     })
    ///     .await?;
    /// ```
    pub async fn with_transaction<T, E, F>(
        &self,
        scope: Option<&mut PgConnection>,
        op: F,
    ) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<sqlx::Error> + Send,
    {
        if let Some(conn) = scope {
            return op(conn).await;
        }

        let mut tx = self.pool.begin().await?;

        match op(&mut *tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}
