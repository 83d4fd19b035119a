// api/dto.rs - request bodies and response views exchanged with clients
//
// Field names are camelCase on the wire. Dates on events and news travel as
// epoch milliseconds; search windows use RFC 3339 query parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Event, News, User};

/// POST /api/users
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// PUT /api/users. `name` identifies the account and must be the caller's own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// POST /api/events
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub name: String,
    /// Participant user names; unknown names are skipped
    #[serde(default)]
    pub participants: Vec<String>,
    /// Start time in epoch milliseconds
    pub date: i64,
    pub place: String,
    pub description: String,
    #[serde(default)]
    pub public_event: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: Uuid,
    pub name: String,
    pub owner_name: String,
    pub participants: Vec<String>,
    pub date: i64,
    pub place: String,
    pub description: String,
    pub public_event: bool,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            owner_name: event.owner_name,
            participants: event.participants,
            date: event.start_date_time.timestamp_millis(),
            place: event.place_name,
            description: event.description,
            public_event: event.public_event,
        }
    }
}

/// Query string of GET /api/events.
///
/// Filters are tried in order: date window, owner, name, place. The first
/// one present wins; with none the full list is returned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSearch {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Owner id or user name
    pub owner: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "placeName")]
    pub place_name: Option<String>,
}

/// POST /event/:id/news
#[derive(Debug, Clone, Deserialize)]
pub struct NewsDraft {
    pub content: String,
    /// Epoch milliseconds, defaults to now
    #[serde(default)]
    pub date: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsView {
    pub id: Uuid,
    pub content: String,
    pub date: i64,
}

impl From<News> for NewsView {
    fn from(news: News) -> Self {
        Self {
            id: news.id,
            content: news.content,
            date: news.create_date.timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_view_never_carries_password() {
        let now = Utc::now();
        let view = UserView::from(User {
            id: Uuid::new_v4(),
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            roles: vec!["ROLE_USER".to_string()],
            created_at: now,
            updated_at: now,
        });

        let body = serde_json::to_value(&view).unwrap();
        let fields = body.as_object().unwrap();
        assert_eq!(fields.len(), 3);
        assert!(!fields.contains_key("password"));
        assert!(!fields.contains_key("password_hash"));
    }

    #[test]
    fn event_draft_reads_camel_case() {
        let draft: EventDraft = serde_json::from_value(json!({
            "name": "Board games",
            "date": 1_700_000_000_000_i64,
            "place": "Main Square",
            "description": "Weekly meetup",
            "publicEvent": true
        }))
        .unwrap();

        assert!(draft.public_event);
        assert!(draft.participants.is_empty());
    }

    #[test]
    fn event_view_reports_start_in_millis() {
        let start = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let view = EventView::from(Event {
            id: Uuid::new_v4(),
            name: "Board games".to_string(),
            owner_id: Uuid::new_v4(),
            owner_name: "alice".to_string(),
            start_date_time: start,
            place_name: "Main Square".to_string(),
            description: "Weekly meetup".to_string(),
            public_event: false,
            participants: vec!["bob".to_string()],
            created_at: start,
        });

        let body = serde_json::to_value(&view).unwrap();
        assert_eq!(body["date"], 1_700_000_000_123_i64);
        assert_eq!(body["ownerName"], "alice");
        assert_eq!(body["place"], "Main Square");
        assert_eq!(body["publicEvent"], false);
    }
}
