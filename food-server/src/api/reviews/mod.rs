//! Review API
//!
//! Reviews are created against an order; listing lives under the
//! restaurant and customer resources.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/orders/{id}/review", post(handler::create))
}
