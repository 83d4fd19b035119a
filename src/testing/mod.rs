use std::sync::Arc;

use crate::api::NewAccount;
use crate::auth::{Principal, DEFAULT_ROLE};
use crate::config::AppConfig;
use crate::database::{InMemoryStore, Store};
use crate::state::AppState;

/// Test utilities: an application state over a fresh in-memory store
pub struct TestContext {
    pub store: Arc<dyn Store>,
    pub state: AppState,
}

impl TestContext {
    /// Development configuration, empty store
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let state = AppState::new(config, store.clone()).expect("test state builds");
        Self { store, state }
    }

    /// Registers each `(name, password)` pair with email `<name>@example.com`
    pub async fn with_users(users: &[(&str, &str)]) -> Self {
        let ctx = Self::new();
        for (name, password) in users {
            ctx.state
                .users
                .register(NewAccount {
                    name: name.to_string(),
                    email: format!("{}@example.com", name),
                    password: password.to_string(),
                })
                .await
                .expect("test user registers");
        }
        ctx
    }

    /// Principal as the login step would produce it, without a password check
    pub fn principal(&self, username: &str) -> Principal {
        Principal::new(username, [DEFAULT_ROLE])
    }

    pub fn token_for(&self, username: &str) -> String {
        self.state
            .tokens
            .issue(&self.principal(username))
            .expect("token issues")
    }
}
