use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct News {
    pub id: Uuid,
    pub event_id: Uuid,
    pub content: String,
    pub create_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNews {
    pub event_id: Uuid,
    pub content: String,
    pub create_date: DateTime<Utc>,
}
