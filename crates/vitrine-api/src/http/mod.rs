//! HTTP/WS boundary: router, handlers, error mapping, response envelope.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
