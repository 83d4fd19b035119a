// Runs the Store contract against Postgres. Skipped unless DATABASE_URL is set.

use anyhow::Result;
use chrono::{Duration, Utc};
use uuid::Uuid;

use sat_api::config::AppConfig;
use sat_api::database::models::{EventQuery, NewEvent, NewNews, NewUser, UserChanges};
use sat_api::database::{DatabaseError, DatabaseManager, PgStore, Store};

async fn connect() -> Result<Option<PgStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store tests");
        return Ok(None);
    };

    let mut config = AppConfig::development().database;
    config.url = Some(url);
    let pool = DatabaseManager::connect(&config).await?;
    DatabaseManager::ensure_schema(&pool).await?;
    Ok(Some(PgStore::new(pool)))
}

fn new_user(prefix: &str) -> NewUser {
    let name = format!("{}{}", prefix, &Uuid::new_v4().simple().to_string()[..10]);
    NewUser {
        email: format!("{}@example.com", name),
        name,
        password_hash: "not-a-real-hash".to_string(),
        roles: vec!["ROLE_USER".to_string()],
    }
}

#[tokio::test]
async fn users_round_trip_and_conflict() -> Result<()> {
    let Some(store) = connect().await? else {
        return Ok(());
    };
    store.health_check().await?;

    let draft = new_user("pgann");
    let user = store.insert_user(draft.clone()).await?;
    assert_eq!(user.name, draft.name);
    assert_eq!(user.roles, vec!["ROLE_USER"]);

    let by_name = store.find_user_by_name(&draft.name).await?.expect("by name");
    assert_eq!(by_name.id, user.id);
    let by_email = store.find_user_by_email(&draft.email).await?.expect("by email");
    assert_eq!(by_email.id, user.id);
    assert!(store.find_user_by_name(&draft.name.to_uppercase()).await?.is_none());

    let duplicate = store.insert_user(draft.clone()).await;
    assert!(matches!(duplicate, Err(DatabaseError::Conflict(_))));

    let updated = store
        .update_user(
            user.id,
            UserChanges {
                password_hash: Some("another-hash".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.password_hash, "another-hash");
    assert_eq!(updated.email, draft.email);

    let missing = store.update_user(Uuid::new_v4(), UserChanges::default()).await;
    assert!(matches!(missing, Err(DatabaseError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn events_participants_news_and_delete() -> Result<()> {
    let Some(store) = connect().await? else {
        return Ok(());
    };

    let owner = store.insert_user(new_user("pgown")).await?;
    let guest = store.insert_user(new_user("pgguest")).await?;
    let marker = Uuid::new_v4().simple().to_string();
    let start = Utc::now() + Duration::days(3650);

    let event = store
        .insert_event(NewEvent {
            name: format!("Quiz {}", marker),
            owner_id: owner.id,
            start_date_time: start,
            place_name: format!("Hall {}", marker),
            description: "Pub quiz".to_string(),
            public_event: true,
            participant_ids: vec![guest.id, guest.id],
        })
        .await?;
    assert_eq!(event.owner_name, owner.name);
    assert_eq!(event.participants, vec![guest.name.clone()]);

    store.add_participant(event.id, owner.id).await?;
    store.add_participant(event.id, owner.id).await?;
    let reloaded = store.find_event(event.id).await?.expect("event");
    assert_eq!(reloaded.participants.len(), 2);

    for query in [
        EventQuery::OwnedBy(owner.id),
        EventQuery::NameContains(marker.clone()),
        EventQuery::PlaceContains(marker.clone()),
        EventQuery::StartsBetween {
            start: start - Duration::minutes(1),
            end: start + Duration::minutes(1),
        },
    ] {
        let found = store.search_events(&query).await?;
        assert!(found.iter().any(|e| e.id == event.id), "{:?}", query);
    }
    // LIKE wildcards are matched literally
    let wildcard = store.search_events(&EventQuery::NameContains("%".to_string())).await?;
    assert!(wildcard.iter().all(|e| e.name.contains('%')));

    let base = Utc::now();
    for (offset, content) in [(0, "first"), (60, "second")] {
        store
            .insert_news(NewNews {
                event_id: event.id,
                content: content.to_string(),
                create_date: base + Duration::seconds(offset),
            })
            .await?;
    }
    let news: Vec<String> = store
        .list_news(event.id)
        .await?
        .into_iter()
        .map(|n| n.content)
        .collect();
    assert_eq!(news, vec!["second", "first"]);

    assert!(store.delete_event(event.id).await?);
    assert!(!store.delete_event(event.id).await?);
    assert!(store.find_event(event.id).await?.is_none());
    assert!(store.list_news(event.id).await?.is_empty());
    Ok(())
}
