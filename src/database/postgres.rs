use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Event, EventQuery, NewEvent, NewNews, NewUser, News, User, UserChanges};
use super::store::Store;

const USER_COLUMNS: &str = "id, name, email, password_hash, roles, created_at, updated_at";

const EVENT_SELECT: &str = r#"
    SELECT e.id, e.name, e.owner_id, o.name AS owner_name, e.start_date_time,
           e.place_name, e.description, e.public_event, e.created_at,
           ARRAY(
               SELECT u.name FROM event_participants p
               JOIN users u ON u.id = p.user_id
               WHERE p.event_id = e.id
               ORDER BY u.name
           ) AS participants
    FROM events e
    JOIN users o ON o.id = e.owner_id"#;

const EVENT_ORDER: &str = "ORDER BY e.start_date_time, e.name";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user_where(&self, column: &str, value: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, roles)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.roles)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError> {
        self.find_user_where("name", name).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.find_user_where("email", email).await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users
             SET email = COALESCE($2, email),
                 password_hash = COALESCE($3, password_hash),
                 updated_at = $4
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_write)?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))
    }

    async fn insert_event(&self, event: NewEvent) -> Result<Event, DatabaseError> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO events (id, name, owner_id, start_date_time, place_name, description, public_event)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(&event.name)
        .bind(event.owner_id)
        .bind(event.start_date_time)
        .bind(&event.place_name)
        .bind(&event.description)
        .bind(event.public_event)
        .execute(&mut *tx)
        .await?;

        for user_id in &event.participant_ids {
            sqlx::query(
                "INSERT INTO event_participants (event_id, user_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_event(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("event {}", id)))
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError> {
        let sql = format!("{} WHERE e.id = $1", EVENT_SELECT);
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn search_events(&self, query: &EventQuery) -> Result<Vec<Event>, DatabaseError> {
        let events = match query {
            EventQuery::All => {
                let sql = format!("{} {}", EVENT_SELECT, EVENT_ORDER);
                sqlx::query_as::<_, Event>(&sql).fetch_all(&self.pool).await?
            }
            EventQuery::StartsBetween { start, end } => {
                let sql = format!(
                    "{} WHERE e.start_date_time BETWEEN $1 AND $2 {}",
                    EVENT_SELECT, EVENT_ORDER
                );
                sqlx::query_as::<_, Event>(&sql)
                    .bind(start)
                    .bind(end)
                    .fetch_all(&self.pool)
                    .await?
            }
            EventQuery::OwnedBy(owner_id) => {
                let sql = format!("{} WHERE e.owner_id = $1 {}", EVENT_SELECT, EVENT_ORDER);
                sqlx::query_as::<_, Event>(&sql)
                    .bind(owner_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            // strpos keeps user input out of LIKE pattern syntax
            EventQuery::NameContains(fragment) => {
                let sql = format!("{} WHERE strpos(e.name, $1) > 0 {}", EVENT_SELECT, EVENT_ORDER);
                sqlx::query_as::<_, Event>(&sql)
                    .bind(fragment)
                    .fetch_all(&self.pool)
                    .await?
            }
            EventQuery::PlaceContains(fragment) => {
                let sql = format!(
                    "{} WHERE strpos(e.place_name, $1) > 0 {}",
                    EVENT_SELECT, EVENT_ORDER
                );
                sqlx::query_as::<_, Event>(&sql)
                    .bind(fragment)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(events)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO event_participants (event_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_news(&self, news: NewNews) -> Result<News, DatabaseError> {
        let created = sqlx::query_as::<_, News>(
            "INSERT INTO news (id, event_id, content, create_date)
             VALUES ($1, $2, $3, $4)
             RETURNING id, event_id, content, create_date",
        )
        .bind(Uuid::new_v4())
        .bind(news.event_id)
        .bind(&news.content)
        .bind(news.create_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_news(&self, event_id: Uuid) -> Result<Vec<News>, DatabaseError> {
        let news = sqlx::query_as::<_, News>(
            "SELECT id, event_id, content, create_date FROM news
             WHERE event_id = $1
             ORDER BY create_date DESC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(news)
    }
}
