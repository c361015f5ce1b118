//! Restaurant API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/active", get(handler::list_active))
        .route("/search", get(handler::search))
        .route("/trending", get(handler::trending))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/with-menu", get(handler::get_with_menu))
        .route("/{id}/menu", get(handler::menu))
        .route("/{id}/menu-items", post(handler::create_menu_item))
        .route("/{id}/reviews", get(handler::reviews))
        .route("/{id}/analytics", get(handler::analytics))
        .route("/{id}/orders", get(handler::orders))
}
