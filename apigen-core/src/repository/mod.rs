//! Persistence abstraction used by the generic controller
//!
//! Controllers only see the [`Repository`] trait. [`MemoryRepository`] is the
//! in-tree implementation backed by a `tokio::sync::RwLock`.

mod memory;

pub use memory::MemoryRepository;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Attribute that is never mass assignable
pub const PRIMARY_KEY: &str = "id";

/// A persisted model
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Primary key rendered as a string
    fn id(&self) -> String;

    /// Attributes accepted from request data when the repository is guarded
    fn fillable() -> &'static [&'static str] {
        &[]
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record {0} no longer exists")]
    Missing(String),

    #[error("storage error: {0}")]
    Backend(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait Repository: Send + Sync + 'static {
    type Record: Record;

    /// Every record, with the given relations eager loaded
    async fn all(&self, with: &[String]) -> RepositoryResult<Vec<Self::Record>>;

    /// Lookup by primary key
    async fn find(&self, id: &str, with: &[String]) -> RepositoryResult<Option<Self::Record>>;

    /// First record whose `field` renders as `value`
    async fn find_by(
        &self,
        field: &str,
        value: &str,
        with: &[String],
    ) -> RepositoryResult<Option<Self::Record>>;

    /// Mass-assign `data` into a new record and persist it
    async fn create(&self, data: Map<String, Value>, unguarded: bool)
        -> RepositoryResult<Self::Record>;

    /// Mass-assign `data` onto `record` and persist it
    async fn update(
        &self,
        record: Self::Record,
        data: Map<String, Value>,
        unguarded: bool,
    ) -> RepositoryResult<Self::Record>;

    async fn delete(&self, record: Self::Record) -> RepositoryResult<()>;
}

/// Keep only the attributes `R` allows to be mass assigned
pub fn fillable_attributes<R: Record>(data: Map<String, Value>, unguarded: bool) -> Map<String, Value> {
    data.into_iter()
        .filter(|(key, _)| key != PRIMARY_KEY)
        .filter(|(key, _)| unguarded || R::fillable().contains(&key.as_str()))
        .collect()
}

/// Render a JSON value the way lookups compare it
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
