//! Base repository trait for database operations.

use crate::db::errors::Result;

/// Common operations over one table.
///
/// There is no update operation: authors and posts are immutable once created.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities with filtering and pagination
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Delete an entity by ID, returning whether a row was removed
    async fn delete(&mut self, id: Self::Id) -> Result<bool>;
}
