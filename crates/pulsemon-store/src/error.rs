/// Errors that can occur within the storage layer.
///
/// The in-memory engine never actually fails, but the [`crate::MetricStore`]
/// trait returns this type so durable implementations have a place to report
/// backend faults without changing the seam.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required record was not found in the backend.
    #[error("Store: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// Generic storage error for cases not covered by other variants.
    #[error("Store: {0}")]
    Other(String),
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
