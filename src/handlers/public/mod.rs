// handlers/public/mod.rs - handlers open to anonymous callers
//
// Route access is decided by the rule table (SECURITY_PUBLIC_PATHS), not by
// which module a handler lives in; these are the routes the default table
// leaves public.

pub mod register;
pub mod root;

pub use register::user_create;
pub use root::{health, root};
