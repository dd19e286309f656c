//! Users: lookups, classification, workspace and conversation membership,
//! guest management and SCIM provisioning.

mod endpoints;
mod requests;
mod scim;
mod service;

pub use endpoints::*;
pub use requests::*;
pub use service::*;
