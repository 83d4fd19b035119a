// handlers/protected/mod.rs - handlers that require an authenticated caller
//
// Each takes `Principal` as an extractor argument, so a request that somehow
// reaches one anonymously is still answered with 401.

pub mod events;
pub mod news;
pub mod session;
pub mod users;
