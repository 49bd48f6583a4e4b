//! HTTP API for diagnostic test records.
//!
//! `api_router()` returns a `Router` with every route nested under
//! `/api/`; `server` binds it to a socket and manages shutdown.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server, RecordServer, ServerError};
pub use types::ApiContext;
