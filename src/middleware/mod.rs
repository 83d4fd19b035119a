pub mod auth;
pub mod gate;
pub mod login;
pub mod response;

pub use auth::authenticate;
pub use gate::{authorize, Access, AccessRule, AccessRules, RuleError};
pub use login::{login, Credentials, LOGIN_PATH};
pub use response::{ApiResponse, ApiResult};
