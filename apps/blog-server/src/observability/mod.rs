//! Observability - request IDs.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestIdMiddleware, assigned_request_id};
