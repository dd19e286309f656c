//! IdP groups, the SCIM groups pushed by the identity provider.

mod endpoints;
mod service;

pub use endpoints::*;
pub use service::*;
