//! HTTP request handlers.

pub mod chat;

/// Plain-text answer for every route that is not `POST /chat`.
pub async fn ok() -> &'static str {
    "OK"
}
