use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/books", post(handlers::add_book))
        .route("/books/:isbn", get(handlers::book_details))
        .route("/books/:isbn/buy", get(handlers::purchase_page))
        .route("/purchase", post(handlers::purchase))
        .route("/outdated", post(handlers::remove_outdated))
        .route("/api/view", get(handlers::get_view))
        .with_state(state)
}
