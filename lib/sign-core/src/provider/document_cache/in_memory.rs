use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{DocumentCache, DocumentCacheError};

#[derive(Debug)]
struct CachedDocument {
    content: Vec<u8>,
    owner: Option<String>,
}

/// Mutex-backed cache; get-check-remove happens under one lock guard, so
/// single consumption holds across concurrent callers.
#[derive(Debug, Default)]
pub struct InMemoryDocumentCache {
    documents: Mutex<HashMap<String, CachedDocument>>,
}

impl InMemoryDocumentCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentCache for InMemoryDocumentCache {
    fn put(&self, id: &str, content: Vec<u8>, owner: Option<String>) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_owned(), CachedDocument { content, owner });
    }

    fn get(&self, id: &str, requester: &str) -> Result<Vec<u8>, DocumentCacheError> {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(document) = documents.remove(id) else {
            return Err(DocumentCacheError::NotFound(id.to_owned()));
        };

        match &document.owner {
            Some(owner) if owner != requester => {
                // denied access must not consume the entry
                documents.insert(id.to_owned(), document);
                Err(DocumentCacheError::NoAccess(id.to_owned()))
            }
            _ => Ok(document.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_entry_denies_other_requester_and_is_retained() {
        let cache = InMemoryDocumentCache::new();
        cache.put("doc-1", b"content".to_vec(), Some("owner1".to_owned()));

        assert_eq!(
            cache.get("doc-1", "owner2"),
            Err(DocumentCacheError::NoAccess("doc-1".to_owned()))
        );

        // the denied attempt must not consume the entry
        assert_eq!(cache.get("doc-1", "owner1"), Ok(b"content".to_vec()));
    }

    #[test]
    fn test_successful_consumption_removes_entry() {
        let cache = InMemoryDocumentCache::new();
        cache.put("doc-1", b"content".to_vec(), Some("owner1".to_owned()));

        assert!(cache.get("doc-1", "owner1").is_ok());
        assert_eq!(
            cache.get("doc-1", "owner1"),
            Err(DocumentCacheError::NotFound("doc-1".to_owned()))
        );
    }

    #[test]
    fn test_unowned_entry_is_consumable_by_anyone() {
        let cache = InMemoryDocumentCache::new();
        cache.put("doc-1", b"content".to_vec(), None);

        assert_eq!(cache.get("doc-1", "anyone"), Ok(b"content".to_vec()));
    }

    #[test]
    fn test_missing_entry_not_found() {
        let cache = InMemoryDocumentCache::new();

        assert_eq!(
            cache.get("absent", "owner1"),
            Err(DocumentCacheError::NotFound("absent".to_owned()))
        );
    }
}
