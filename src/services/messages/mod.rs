//! Messages: updates, deletion, history, threads and block replacement.

mod endpoints;
mod requests;
mod service;

pub use endpoints::*;
pub use requests::*;
pub use service::*;
