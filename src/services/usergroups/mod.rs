//! Usergroups: listing and membership.

mod endpoints;
mod service;

pub use endpoints::*;
pub use service::*;
