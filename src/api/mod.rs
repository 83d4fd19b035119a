pub mod dto;
pub mod extract;

pub use dto::{
    AccountUpdate, EventDraft, EventSearch, EventView, NewAccount, NewsDraft, NewsView, UserView,
};
pub use extract::{ApiJson, ApiQuery};
