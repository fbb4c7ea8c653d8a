use thiserror::Error;

/// Failure kinds surfaced by the catalog layer.
///
/// The first four are the contract with callers and must stay
/// distinguishable: a transport maps each to a different response. Store
/// failures always land in `Backend`; nothing is retried or swallowed here -
/// retry policy belongs to the calling layer.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("malformed filter `{field}`: {value:?}")]
    MalformedFilter { field: &'static str, value: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("backend unavailable: {0}")]
    Backend(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Backend(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for CatalogError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        CatalogError::Backend(err.to_string())
    }
}

impl From<surrealdb::Error> for CatalogError {
    fn from(err: surrealdb::Error) -> Self {
        CatalogError::Backend(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
