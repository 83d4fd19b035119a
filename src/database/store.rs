use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Event, EventQuery, NewEvent, NewNews, NewUser, News, User, UserChanges};

/// Persistence operations used by the services and the credential verifier.
///
/// Implemented by `PgStore` for deployments and `InMemoryStore` for local
/// development and tests. Implementations must be safe to share across
/// request tasks.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Users
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    /// Exact, case-sensitive match
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError>;

    // Events
    async fn insert_event(&self, event: NewEvent) -> Result<Event, DatabaseError>;
    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError>;
    /// Results are ordered by start time, then name
    async fn search_events(&self, query: &EventQuery) -> Result<Vec<Event>, DatabaseError>;
    /// Returns false when no such event existed
    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError>;
    /// Idempotent
    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), DatabaseError>;

    // News
    async fn insert_news(&self, news: NewNews) -> Result<News, DatabaseError>;
    /// Newest first
    async fn list_news(&self, event_id: Uuid) -> Result<Vec<News>, DatabaseError>;
}
