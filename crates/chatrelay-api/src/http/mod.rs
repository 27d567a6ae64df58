//! HTTP layer for the relay.
//!
//! A single `POST /chat` endpoint with permissive CORS; every other
//! path or method answers `200 OK`.

pub mod error;
pub mod handlers;
pub mod router;
