use crate::document::Document;
use crate::error::StoreError;
use crate::query::Query;

/// Client for a document database.
///
/// Implementations own whatever connection handle they need and must be safe
/// to share between tasks. Each call is a single request against the store.
#[allow(async_fn_in_trait)]
pub trait DocumentStore: Send + Sync + 'static {
    /// Insert a document into `collection` and return its store-assigned id.
    async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    /// Return the documents in `collection` matching `query`, each with its
    /// `_id` populated. Order is whatever the store yields.
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;
}
