use thiserror::Error;

/// Errors surfaced by the repository layer.
///
/// The service layer never lets these escape to clients; they are logged
/// and translated into response-envelope error messages.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
