use super::domain::{DataSet, MetricRecord, SystemParameters};

/// Storage for imported metric records, one record set per indicator and kind.
///
/// Implementations hand out snapshots; callers never hold a live view.
pub trait MetricStore: Send + Sync {
    /// Replaces the whole record set (last import wins).
    fn replace(&self, set: DataSet, records: Vec<MetricRecord>) -> Result<(), RepositoryError>;
    fn list(&self, set: DataSet) -> Result<Vec<MetricRecord>, RepositoryError>;
    /// Removes every record of the set, returning how many were dropped.
    fn clear(&self, set: DataSet) -> Result<usize, RepositoryError>;
}

/// Storage for the single system parameters document.
pub trait ParameterStore: Send + Sync {
    /// Stored parameters, or `None` before an administrator saved any.
    fn load(&self) -> Result<Option<SystemParameters>, RepositoryError>;
    fn save(&self, parameters: SystemParameters) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
