pub mod event_service;
pub mod user_service;
pub mod validation;

pub use event_service::EventService;
pub use user_service::UserService;
