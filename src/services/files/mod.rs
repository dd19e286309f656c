//! Files: metadata, listing, deletion, upload and content download.

mod endpoints;
mod requests;
mod service;

pub use endpoints::*;
pub use requests::*;
pub use service::*;
