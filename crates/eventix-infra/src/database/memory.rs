//! In-memory repositories, used when no database URL is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use eventix_core::domain::{Event, Ticket, User, mask_email};
use eventix_core::error::RepoError;
use eventix_core::ports::{
    BaseRepository, EventRepository, TicketRepository, UserRepository,
};

/// Users keyed by id. Email uniqueness is enforced on insert.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint(format!(
                "email {} already registered",
                mask_email(&user.email)
            )));
        }
        if users.contains_key(&user.id) {
            return Err(RepoError::Constraint(format!("duplicate id {}", user.id)));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<Uuid, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Event, Uuid> for InMemoryEventRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, RepoError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn insert(&self, event: Event) -> Result<Event, RepoError> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(RepoError::Constraint(format!("duplicate id {}", event.id)));
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.events.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn list_all(&self) -> Result<Vec<Event>, RepoError> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Option<Event>, RepoError> {
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(&id) else {
            return Ok(None);
        };

        event.likes = event
            .likes
            .checked_add(1)
            .ok_or_else(|| RepoError::Constraint("likes counter overflow".to_string()))?;
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: RwLock<HashMap<Uuid, Ticket>>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Ticket, Uuid> for InMemoryTicketRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, RepoError> {
        Ok(self.tickets.read().await.get(&id).cloned())
    }

    async fn insert(&self, ticket: Ticket) -> Result<Ticket, RepoError> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(RepoError::Constraint(format!("duplicate id {}", ticket.id)));
        }
        tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.tickets.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Ticket>, RepoError> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.created_at);
        Ok(tickets)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeDelta;
    use eventix_core::domain::{NewTicket, TicketDetails};

    use super::*;

    fn user(email: &str) -> User {
        User::new("Ada".to_string(), email.to_string(), "hash".to_string())
    }

    fn event() -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            owner: "user-1".to_string(),
            title: "Rust Meetup".to_string(),
            description: "Monthly gathering of Rustaceans.".to_string(),
            organized_by: "Rust Guild".to_string(),
            event_date: now,
            event_time: "18:30".to_string(),
            location: "Berlin".to_string(),
            participants: 0,
            count: 0,
            income: 0.0,
            ticket_price: 10.0,
            quantity: 50,
            image_path: String::new(),
            likes: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn ticket(user_id: &str) -> Ticket {
        Ticket::new(NewTicket {
            user_id: user_id.to_string(),
            event_id: "e1".to_string(),
            details: TicketDetails {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                event_name: "Rust Meetup".to_string(),
                event_date: Utc::now(),
                event_time: "18:30".to_string(),
                ticket_price: 10.0,
                qr_payload: "qr".to_string(),
            },
            count: 1,
        })
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("ada@example.com")).await.unwrap();

        let err = repo.insert(user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        assert!(repo.insert(user("grace@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_user_by_email_and_id() {
        let repo = InMemoryUserRepository::new();
        let stored = repo.insert(user("ada@example.com")).await.unwrap();

        let by_email = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, stored.id);
        assert!(repo.find_by_id(stored.id).await.unwrap().is_some());
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let repo = InMemoryUserRepository::new();
        let stored = repo.insert(user("ada@example.com")).await.unwrap();

        assert!(repo.delete(stored.id).await.unwrap());
        assert!(!repo.delete(stored.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_events_listed_oldest_first() {
        let repo = InMemoryEventRepository::new();
        let mut older = event();
        older.created_at -= TimeDelta::hours(1);
        let newer = event();

        repo.insert(newer.clone()).await.unwrap();
        repo.insert(older.clone()).await.unwrap();

        let ids: Vec<Uuid> = repo.list_all().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    }

    #[tokio::test]
    async fn test_concurrent_likes_are_not_lost() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let stored = repo.insert(event()).await.unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_likes(stored.id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let event = repo.find_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(event.likes, 50);
    }

    #[tokio::test]
    async fn test_like_absent_event() {
        let repo = InMemoryEventRepository::new();
        assert!(repo.increment_likes(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_like_at_counter_ceiling_fails_without_wrapping() {
        let repo = InMemoryEventRepository::new();
        let event = repo
            .insert(Event {
                likes: i64::MAX,
                ..event()
            })
            .await
            .unwrap();

        let err = repo.increment_likes(event.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        let stored = repo.find_by_id(event.id).await.unwrap().unwrap();
        assert_eq!(stored.likes, i64::MAX);
    }

    #[tokio::test]
    async fn test_tickets_filtered_by_user() {
        let repo = InMemoryTicketRepository::new();
        repo.insert(ticket("u1")).await.unwrap();
        repo.insert(ticket("u1")).await.unwrap();
        repo.insert(ticket("u2")).await.unwrap();

        assert_eq!(repo.find_by_user_id("u1").await.unwrap().len(), 2);
        assert_eq!(repo.find_by_user_id("u2").await.unwrap().len(), 1);
        assert!(repo.find_by_user_id("u3").await.unwrap().is_empty());
    }
}
