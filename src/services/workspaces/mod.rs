//! Workspaces: lookup, name resolution and membership listings.

mod endpoints;
mod service;

pub use endpoints::*;
pub use service::*;
