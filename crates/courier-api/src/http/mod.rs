//! HTTP/REST API layer for Courier.
//!
//! Axum-based REST API at `/api/v1/` exposing the message list and the
//! message append operation, with CORS support.

pub mod error;
pub mod handlers;
pub mod router;
