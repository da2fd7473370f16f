use axum::Router;
use axum::routing::{post, put};
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(handler::update_tip))
        .route("/{id}/generate-title", post(handler::generate_title))
}
