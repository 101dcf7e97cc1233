//! Base repository trait for database operations.

/// Contains the Repository trait.
///
/// A repository is the data access layer for a single table. It provides methods for
/// creating, reading, updating, and deleting entities, as well as listing them with simple
/// filters. Implementations never validate field contents: callers hand them values that
/// have already passed request validation.
use crate::db::errors::Result;

/// Base repository trait providing common database operations
///
/// This trait has separate associated types for create requests, update requests, and responses.
/// Every method maps to at most one storage statement.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// The request type for creating entities
    type CreateRequest;

    /// The request type for updating entities
    type UpdateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities with filtering, ordering and pagination
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Delete an entity by ID. Returns false when nothing was deleted.
    async fn delete(&self, id: Self::Id) -> Result<bool>;

    /// Update an entity by ID. Returns `None` when the entity does not exist.
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Option<Self::Response>>;
}
