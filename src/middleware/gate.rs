use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::Authentication;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches one literal path
    Exact(String),
    /// `/base/**`: matches `/base` and everything below it
    Subtree(String),
    /// `/**`
    Any,
}

impl PathPattern {
    fn parse(raw: &str) -> Result<Self, RuleError> {
        if !raw.starts_with('/') {
            return Err(RuleError::InvalidPath(raw.to_string()));
        }
        if raw == "/**" {
            return Ok(PathPattern::Any);
        }
        if let Some(base) = raw.strip_suffix("/**") {
            return Ok(PathPattern::Subtree(base.to_string()));
        }
        if raw.contains('*') {
            return Err(RuleError::InvalidPath(raw.to_string()));
        }
        Ok(PathPattern::Exact(raw.to_string()))
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(literal) => path == literal,
            PathPattern::Subtree(base) => {
                path == base
                    || path
                        .strip_prefix(base.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            PathPattern::Any => true,
        }
    }

    /// Higher is more specific: literals, then longer subtrees, then the catch-all
    fn specificity(&self) -> (u8, usize) {
        match self {
            PathPattern::Exact(literal) => (2, literal.len()),
            PathPattern::Subtree(base) => (1, base.len()),
            PathPattern::Any => (0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub method: Option<Method>,
    pub pattern: PathPattern,
    pub access: Access,
}

impl AccessRule {
    /// Parses `"[METHOD ]/path"`
    pub fn parse(raw: &str, access: Access) -> Result<Self, RuleError> {
        let raw = raw.trim();
        let (method, path) = match raw.split_once(char::is_whitespace) {
            Some((method, path)) => {
                let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                    .map_err(|_| RuleError::InvalidMethod(method.to_string()))?;
                (Some(method), path.trim())
            }
            None => (None, raw),
        };

        Ok(Self {
            method,
            pattern: PathPattern::parse(path)?,
            access,
        })
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().map_or(true, |m| m == method) && self.pattern.matches(path)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid HTTP method in access rule: {0}")]
    InvalidMethod(String),

    #[error("invalid path pattern in access rule: {0}")]
    InvalidPath(String),
}

/// Static rule table consulted by the authorization gate.
///
/// Anything no rule matches falls through to the catch-all, which requires
/// an authenticated principal.
#[derive(Debug, Clone)]
pub struct AccessRules {
    rules: Vec<AccessRule>,
}

impl AccessRules {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    pub fn from_public_paths<S: AsRef<str>>(paths: &[S]) -> Result<Self, RuleError> {
        let rules = paths
            .iter()
            .map(|p| AccessRule::parse(p.as_ref(), Access::Public))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    pub fn access_for(&self, method: &Method, path: &str) -> Access {
        self.rules
            .iter()
            .filter(|rule| rule.matches(method, path))
            .max_by_key(|rule| (rule.pattern.specificity(), rule.method.is_some()))
            .map_or(Access::Authenticated, |rule| rule.access)
    }
}

/// Rejects requests to protected paths that carry no authenticated principal
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let access = state.rules.access_for(request.method(), request.uri().path());
    let authenticated = request
        .extensions()
        .get::<Authentication>()
        .is_some_and(Authentication::is_authenticated);

    if access == Access::Public || authenticated {
        return next.run(request).await;
    }

    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        "Rejected unauthenticated request"
    );
    ApiError::unauthorized().into_response()
}
