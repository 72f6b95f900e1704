use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Event, Ticket, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Uniqueness violations surface as `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Returns whether a row was removed.
    async fn delete(&self, id: ID) -> Result<bool, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Event repository.
#[async_trait]
pub trait EventRepository: BaseRepository<Event, Uuid> {
    /// All events, oldest first.
    async fn list_all(&self) -> Result<Vec<Event>, RepoError>;

    /// Atomically add one like and return the updated event, or `None` if absent.
    async fn increment_likes(&self, id: Uuid) -> Result<Option<Event>, RepoError>;
}

/// Ticket repository.
#[async_trait]
pub trait TicketRepository: BaseRepository<Ticket, Uuid> {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Ticket>, RepoError>;
}
