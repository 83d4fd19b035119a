// In-memory store for local development and tests.
// Mirrors PgStore semantics: unique user names/emails, cascade on event delete,
// the same result ordering.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Event, EventQuery, NewEvent, NewNews, NewUser, News, User, UserChanges};
use super::store::Store;

#[derive(Debug, Clone)]
struct EventRow {
    id: Uuid,
    name: String,
    owner_id: Uuid,
    start_date_time: DateTime<Utc>,
    place_name: String,
    description: String,
    public_event: bool,
    participants: BTreeSet<Uuid>,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    events: HashMap<Uuid, EventRow>,
    news: Vec<News>,
}

impl Tables {
    fn user_name(&self, id: &Uuid) -> Option<String> {
        self.users.get(id).map(|u| u.name.clone())
    }

    fn materialize(&self, row: &EventRow) -> Event {
        let mut participants: Vec<String> = row
            .participants
            .iter()
            .filter_map(|id| self.user_name(id))
            .collect();
        participants.sort();

        Event {
            id: row.id,
            name: row.name.clone(),
            owner_id: row.owner_id,
            owner_name: self.user_name(&row.owner_id).unwrap_or_default(),
            start_date_time: row.start_date_time,
            place_name: row.place_name.clone(),
            description: row.description.clone(),
            public_event: row.public_event,
            participants,
            created_at: row.created_at,
        }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.name == user.name) {
            return Err(DatabaseError::Conflict("users_name_key".to_string()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.name == name).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if let Some(email) = &changes.email {
            if tables.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(DatabaseError::Conflict("users_email_key".to_string()));
            }
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn insert_event(&self, event: NewEvent) -> Result<Event, DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&event.owner_id) {
            return Err(DatabaseError::NotFound(format!("user {}", event.owner_id)));
        }

        let row = EventRow {
            id: Uuid::new_v4(),
            name: event.name,
            owner_id: event.owner_id,
            start_date_time: event.start_date_time,
            place_name: event.place_name,
            description: event.description,
            public_event: event.public_event,
            participants: event
                .participant_ids
                .into_iter()
                .filter(|id| tables.users.contains_key(id))
                .collect(),
            created_at: Utc::now(),
        };
        let created = tables.materialize(&row);
        tables.events.insert(row.id, row);
        Ok(created)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).map(|row| tables.materialize(row)))
    }

    async fn search_events(&self, query: &EventQuery) -> Result<Vec<Event>, DatabaseError> {
        let tables = self.tables.read().await;

        let mut rows: Vec<&EventRow> = tables
            .events
            .values()
            .filter(|row| match query {
                EventQuery::All => true,
                EventQuery::StartsBetween { start, end } => {
                    row.start_date_time >= *start && row.start_date_time <= *end
                }
                EventQuery::OwnedBy(owner_id) => row.owner_id == *owner_id,
                EventQuery::NameContains(fragment) => row.name.contains(fragment.as_str()),
                EventQuery::PlaceContains(fragment) => row.place_name.contains(fragment.as_str()),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.start_date_time
                .cmp(&b.start_date_time)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(rows.into_iter().map(|row| tables.materialize(row)).collect())
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let existed = tables.events.remove(&id).is_some();
        if existed {
            tables.news.retain(|n| n.event_id != id);
        }
        Ok(existed)
    }

    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::NotFound(format!("user {}", user_id)));
        }
        let row = tables
            .events
            .get_mut(&event_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("event {}", event_id)))?;
        row.participants.insert(user_id);
        Ok(())
    }

    async fn insert_news(&self, news: NewNews) -> Result<News, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&news.event_id) {
            return Err(DatabaseError::NotFound(format!("event {}", news.event_id)));
        }
        let row = News {
            id: Uuid::new_v4(),
            event_id: news.event_id,
            content: news.content,
            create_date: news.create_date,
        };
        tables.news.push(row.clone());
        Ok(row)
    }

    async fn list_news(&self, event_id: Uuid) -> Result<Vec<News>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut news: Vec<News> = tables
            .news
            .iter()
            .filter(|n| n.event_id == event_id)
            .cloned()
            .collect();
        news.sort_by(|a, b| b.create_date.cmp(&a.create_date));
        Ok(news)
    }
}
