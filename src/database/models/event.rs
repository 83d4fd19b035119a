use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An event joined with its owner's and participants' names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub start_date_time: DateTime<Utc>,
    pub place_name: String,
    pub description: String,
    pub public_event: bool,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub owner_id: Uuid,
    pub start_date_time: DateTime<Utc>,
    pub place_name: String,
    pub description: String,
    pub public_event: bool,
    pub participant_ids: Vec<Uuid>,
}

/// Event listing filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventQuery {
    All,
    StartsBetween {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    OwnedBy(Uuid),
    NameContains(String),
    PlaceContains(String),
}
