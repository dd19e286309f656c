//! Conversations: lookup, admin actions, membership and message delegation.

mod endpoints;
mod requests;
mod service;

pub use endpoints::*;
pub use requests::*;
pub use service::*;
