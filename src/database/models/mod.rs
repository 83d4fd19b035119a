pub mod event;
pub mod news;
pub mod user;

pub use event::{Event, EventQuery, NewEvent};
pub use news::{NewNews, News};
pub use user::{NewUser, User, UserChanges};
