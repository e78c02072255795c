use thiserror::Error;

pub mod in_memory;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentCacheError {
    #[error("no document cached under reference `{0}`")]
    NotFound(String),
    #[error("cached document `{0}` belongs to another owner")]
    NoAccess(String),
}

/// Shared store for documents uploaded ahead of a sign request and consumed
/// by reference during pre-processing.
///
/// A successful owned `get` removes the entry, and the ownership check plus
/// removal must be atomic per key: two concurrent consumers must never both
/// succeed against the same reference.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait DocumentCache: Send + Sync {
    fn put(&self, id: &str, content: Vec<u8>, owner: Option<String>);

    /// Returns and removes the cached content when `requester` matches the
    /// recorded owner (or when no owner was recorded). A denied request
    /// leaves the entry in place.
    fn get(&self, id: &str, requester: &str) -> Result<Vec<u8>, DocumentCacheError>;
}
