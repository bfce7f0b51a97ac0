//! Generic CRUD + count over a single table, driven by a `FindBy`.

mod postgres;

pub use postgres::PgRepository;

use crate::filter::FindBy;
use crate::model::Model;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("row decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("property '{0}' is already being filtered")]
    AlreadyFiltered(String),
    #[error("{0}: This property does not exist.")]
    UnknownProperty(String),
    #[error("record has no identifier")]
    MissingIdentifier,
}

/// Storage for one model type. Filter problems are reported before any storage access.
#[async_trait]
pub trait Repository<M: Model>: Send + Sync {
    /// Load by identifier; `None` when no row matches.
    async fn find(&self, id: &str) -> Result<Option<M>, RepositoryError>;

    /// First row matching the filter (limit forced to 1).
    async fn find_one_by(&self, find_by: &FindBy) -> Result<Option<M>, RepositoryError>;

    async fn find_by(&self, find_by: &FindBy) -> Result<Vec<M>, RepositoryError>;

    async fn create(&self, record: &M) -> Result<(), RepositoryError>;

    /// Overwrite every mapped column of the row with the record's identifier.
    async fn update(&self, record: &M) -> Result<(), RepositoryError>;

    async fn delete(&self, record: &M) -> Result<(), RepositoryError>;

    /// Rows matching the filter, ignoring limit and offset.
    async fn count(&self, find_by: &FindBy) -> Result<i64, RepositoryError>;
}
