//! Customer API

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/customers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/orders",
            get(handler::orders).post(handler::place_order),
        )
        .route("/{id}/reviews", get(handler::reviews))
        .route("/{id}/analytics", get(handler::analytics))
        .route("/{id}/recommendations", get(handler::recommendations))
}
