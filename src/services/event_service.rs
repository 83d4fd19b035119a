use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::{EventDraft, EventSearch, EventView, NewsDraft, NewsView};
use crate::auth::Principal;
use crate::database::models::{Event, EventQuery, NewEvent, NewNews, User};
use crate::database::Store;
use crate::error::{ApiError, ErrorInfo};

use super::validation::{FieldErrors, EVENT_FIELD_MIN_LEN};

/// Events, their participants and their news feed
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn Store>,
}

impl EventService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates an event owned by the caller
    pub async fn create(&self, principal: &Principal, draft: EventDraft) -> Result<EventView, ApiError> {
        let mut errors = FieldErrors::new();
        errors.check_min_len("name", &draft.name, EVENT_FIELD_MIN_LEN);
        errors.check_min_len("place", &draft.place, EVENT_FIELD_MIN_LEN);
        errors.check_min_len("description", &draft.description, EVENT_FIELD_MIN_LEN);
        let start = DateTime::<Utc>::from_timestamp_millis(draft.date);
        if start.is_none() {
            errors.add("date", "is out of range");
        }
        errors.into_result()?;
        let start_date_time = start.ok_or_else(|| ApiError::bad_request("Invalid date"))?;

        let owner = self
            .store
            .find_user_by_name(&principal.username)
            .await?
            .ok_or(ErrorInfo::EventOwnerNotFound)?;

        let mut participant_ids = Vec::with_capacity(draft.participants.len());
        for name in &draft.participants {
            match self.store.find_user_by_name(name).await? {
                Some(user) if user.id != owner.id && !participant_ids.contains(&user.id) => {
                    participant_ids.push(user.id)
                }
                Some(_) => {}
                None => tracing::debug!(participant = %name, "Skipping unknown participant"),
            }
        }

        let event = self
            .store
            .insert_event(NewEvent {
                name: draft.name.trim().to_string(),
                owner_id: owner.id,
                start_date_time,
                place_name: draft.place.trim().to_string(),
                description: draft.description.trim().to_string(),
                public_event: draft.public_event,
                participant_ids,
            })
            .await?;

        tracing::info!(event_id = %event.id, owner = %owner.name, "Created event");
        Ok(event.into())
    }

    pub async fn get(&self, id: &str) -> Result<EventView, ApiError> {
        self.find(id).await.map(EventView::from)
    }

    pub async fn search(&self, search: EventSearch) -> Result<Vec<EventView>, ApiError> {
        let query = self.resolve_query(search).await?;
        let events = self.store.search_events(&query).await?;
        Ok(events.into_iter().map(EventView::from).collect())
    }

    /// Only the owner may delete an event
    pub async fn delete(&self, principal: &Principal, id: &str) -> Result<(), ApiError> {
        let event = self.find(id).await?;
        if event.owner_name != principal.username {
            return Err(ApiError::forbidden("Only the owner may delete an event"));
        }

        if !self.store.delete_event(event.id).await? {
            return Err(ErrorInfo::EventNotFound.into());
        }
        tracing::info!(event_id = %event.id, "Deleted event");
        Ok(())
    }

    /// Adds the caller to the event's participants
    pub async fn join(&self, principal: &Principal, id: &str) -> Result<EventView, ApiError> {
        let user = self.account_of(principal).await?;
        let event = self.find(id).await?;

        if event.owner_id == user.id || event.has_participant(&user.name) {
            return Err(ErrorInfo::AlreadyJoined.into());
        }

        self.store.add_participant(event.id, user.id).await?;
        tracing::info!(event_id = %event.id, username = %user.name, "Joined event");
        self.get(id).await
    }

    pub async fn add_news(&self, event_id: &str, draft: NewsDraft) -> Result<NewsView, ApiError> {
        let event = self.find(event_id).await?;

        let mut errors = FieldErrors::new();
        errors.check_not_blank("content", &draft.content);
        let create_date = match draft.date {
            Some(millis) => DateTime::<Utc>::from_timestamp_millis(millis),
            None => Some(Utc::now()),
        };
        if create_date.is_none() {
            errors.add("date", "is out of range");
        }
        errors.into_result()?;

        let news = self
            .store
            .insert_news(NewNews {
                event_id: event.id,
                content: draft.content,
                create_date: create_date.unwrap_or_else(Utc::now),
            })
            .await?;
        Ok(news.into())
    }

    /// News of one event, newest first
    pub async fn list_news(&self, event_id: &str) -> Result<Vec<NewsView>, ApiError> {
        let event = self.find(event_id).await?;
        let news = self.store.list_news(event.id).await?;
        Ok(news.into_iter().map(NewsView::from).collect())
    }

    async fn find(&self, id: &str) -> Result<Event, ApiError> {
        let id = Uuid::parse_str(id).map_err(|_| ErrorInfo::EventNotFound)?;
        self.store
            .find_event(id)
            .await?
            .ok_or_else(|| ErrorInfo::EventNotFound.into())
    }

    async fn account_of(&self, principal: &Principal) -> Result<User, ApiError> {
        self.store
            .find_user_by_name(&principal.username)
            .await?
            .ok_or_else(|| ErrorInfo::UserNotFound.into())
    }

    async fn resolve_query(&self, search: EventSearch) -> Result<EventQuery, ApiError> {
        match (search.start_date, search.end_date) {
            (Some(start), Some(end)) => {
                if start > end {
                    return Err(ApiError::bad_request("start_date must not be after end_date"));
                }
                return Ok(EventQuery::StartsBetween { start, end });
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ApiError::bad_request(
                    "start_date and end_date must be given together",
                ));
            }
            (None, None) => {}
        }

        if let Some(owner) = search.owner.filter(|o| !o.is_empty()) {
            let user = match Uuid::parse_str(&owner) {
                Ok(id) => self.store.find_user_by_id(id).await?,
                Err(_) => self.store.find_user_by_name(&owner).await?,
            };
            let user = user.ok_or(ErrorInfo::UserNotFound)?;
            return Ok(EventQuery::OwnedBy(user.id));
        }
        if let Some(name) = search.name.filter(|n| !n.is_empty()) {
            return Ok(EventQuery::NameContains(name));
        }
        if let Some(place) = search.place_name.filter(|p| !p.is_empty()) {
            return Ok(EventQuery::PlaceContains(place));
        }
        Ok(EventQuery::All)
    }
}
