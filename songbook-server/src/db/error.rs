//! Repository error taxonomy

/// Database error type
///
/// Only two storage signals are translated into domain kinds: "no row came
/// back" and a unique-constraint violation. Everything else stays `Sqlx` and
/// reaches the caller verbatim.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("object not found: {resource} with id = {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("object is duplicate: song with name = {name} and group = {group} already exists")]
    Duplicate { name: String, group: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn duplicate(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::Duplicate {
            name: name.into(),
            group: group.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// True when `err` is Postgres reporting a unique-constraint violation (23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
