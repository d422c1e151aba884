use crate::errors::ApiError;
use crate::models::Book;
use crate::notifier::ToastKind;
use crate::session::SessionId;
use crate::state::AppState;
use tracing::{debug, error, info};

pub const LOAD_FAILED: &str = "Failed to load books";

/// Fetches the book list and publishes it. While the request is in flight
/// the published status is `Loading`; on failure it is `Failed` and the
/// requesting session gets an error toast. A load overtaken by a newer one
/// publishes nothing.
pub async fn load_books(state: &AppState, session: &SessionId) {
    let generation = state.begin_load().await;
    info!("loading books from {} (load {generation})", state.api.base());

    match state.api.list_books().await {
        Ok(books) => {
            let count = books.len();
            if state.finish_load(generation, Ok(books)).await {
                info!("loaded {count} books");
            } else {
                debug!("load {generation} superseded, dropping {count} books");
            }
        }
        Err(err) => {
            error!("error loading books: {err}");
            if state.finish_load(generation, Err(err.to_string())).await {
                state.notify(session, ToastKind::Error, LOAD_FAILED).await;
            } else {
                debug!("load {generation} superseded, dropping its failure");
            }
        }
    }
}

/// Looks in the last fetched list first, then asks the server.
pub async fn find_book(state: &AppState, isbn: &str) -> Result<Option<Book>, ApiError> {
    if let Some(book) = state.catalog().await.find(isbn) {
        return Ok(Some(book.clone()));
    }
    state.api.get_book(isbn).await
}
