// handlers/mod.rs - two-tier handler layout
//
// Public handlers run for anonymous callers. Protected handlers take a
// `Principal` argument and are only reached once the authorization gate has
// let the request through.

pub mod protected;
pub mod public;
