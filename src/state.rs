use std::sync::Arc;

use anyhow::Context;

use crate::auth::{CredentialVerifier, TokenCodec};
use crate::config::AppConfig;
use crate::database::Store;
use crate::middleware::AccessRules;
use crate::services::{EventService, UserService};

/// Everything handlers and middleware share, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenCodec>,
    pub verifier: CredentialVerifier,
    pub rules: Arc<AccessRules>,
    pub users: UserService,
    pub events: EventService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> anyhow::Result<Self> {
        config.validate().context("invalid configuration")?;

        let tokens = TokenCodec::from_config(&config.security).context("failed to set up token codec")?;
        let rules = AccessRules::from_public_paths(&config.security.public_paths)
            .context("invalid SECURITY_PUBLIC_PATHS")?;

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            verifier: CredentialVerifier::new(store.clone()),
            rules: Arc::new(rules),
            users: UserService::new(store.clone()),
            events: EventService::new(store.clone()),
            store,
        })
    }
}
