use crate::errors::{AppError, FormError};
use crate::filter::Filter;
use crate::forms::{self, AddBookForm, OutdatedForm, PurchaseForm};
use crate::loader::{find_book, load_books};
use crate::models::{Book, BookType, Tab};
use crate::notifier::Toast;
use crate::render::purchase_summary;
use crate::session::{Session, SessionId};
use crate::state::{AppState, LoadStatus, ViewState};
use crate::stats::{build_stats, InventoryStats};
use crate::ui::{render_details, render_index, render_purchase};
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// UI events carried in the query string. Absent keys keep the current
/// selection.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub tab: Option<String>,
    pub filter: Option<String>,
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub book_type: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
struct ViewEvent {
    tab: Option<Tab>,
    filter: Option<Filter>,
    search: Option<String>,
    book_type: Option<BookType>,
}

impl ViewQuery {
    fn parse(&self) -> Result<ViewEvent, AppError> {
        Ok(ViewEvent {
            tab: self.tab.as_deref().map(str::parse).transpose().map_err(AppError::bad_request)?,
            filter: self
                .filter
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(AppError::bad_request)?,
            search: self.q.clone(),
            book_type: self
                .book_type
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(AppError::bad_request)?,
        })
    }
}

impl ViewEvent {
    fn apply(self, mut view: ViewState) -> ViewState {
        if let Some(tab) = self.tab {
            view = view.with_tab(tab);
        }
        if let Some(filter) = self.filter {
            view = view.with_filter(filter);
        }
        if let Some(search) = self.search {
            view = view.with_search(search);
        }
        if let Some(book_type) = self.book_type {
            view = view.with_book_type(book_type);
        }
        view
    }

    /// Switching to the browse tab refreshes the list, as does the very
    /// first visit.
    fn needs_reload(&self, view: &ViewState) -> bool {
        self.tab == Some(Tab::Browse) || *view.status() == LoadStatus::NotLoaded
    }
}

async fn apply_query(
    state: &AppState,
    session: &SessionId,
    query: &ViewQuery,
) -> Result<ViewState, AppError> {
    let event = query.parse()?;
    debug!("view event {event:?}");
    let reload = event.needs_reload(&state.view(session).await);
    let view = state.update(session, |view| event.apply(view)).await;
    if reload {
        load_books(state, session).await;
        return Ok(state.view(session).await);
    }
    Ok(view)
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ViewQuery>,
) -> Result<(Session, Html<String>), AppError> {
    let view = apply_query(&state, &session.id, &query).await?;
    let stats = build_stats(view.books());
    let toast = state.toast(&session.id).await;
    let page = Html(render_index(&view, &stats, toast.as_ref()));
    Ok((session, page))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub tab: Tab,
    pub filter: Filter,
    pub search: String,
    pub book_type: BookType,
    pub status: LoadStatus,
    pub books: Vec<Book>,
    pub stats: InventoryStats,
    pub toast: Option<Toast>,
}

pub async fn get_view(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ViewQuery>,
) -> Result<(Session, Json<ViewSnapshot>), AppError> {
    let view = apply_query(&state, &session.id, &query).await?;
    let snapshot = ViewSnapshot {
        tab: view.tab(),
        filter: view.filter(),
        search: view.search().to_string(),
        book_type: view.book_type(),
        status: view.status().clone(),
        books: view.visible_books().into_iter().cloned().collect(),
        stats: build_stats(view.books()),
        toast: state.toast(&session.id).await,
    };
    Ok((session, Json(snapshot)))
}

async fn lookup_book(state: &AppState, isbn: &str) -> Result<Book, AppError> {
    find_book(state, isbn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book with ISBN {isbn} not found")))
}

pub async fn book_details(
    State(state): State<AppState>,
    session: Session,
    Path(isbn): Path<String>,
) -> Result<(Session, Html<String>), AppError> {
    let book = lookup_book(&state, &isbn).await?;
    let toast = state.toast(&session.id).await;
    let page = Html(render_details(&book, toast.as_ref()));
    Ok((session, page))
}

#[derive(Debug, Default, Deserialize)]
pub struct QuantityQuery {
    pub quantity: Option<String>,
}

pub async fn purchase_page(
    State(state): State<AppState>,
    session: Session,
    Path(isbn): Path<String>,
    Query(query): Query<QuantityQuery>,
) -> Result<(Session, Html<String>), AppError> {
    let book = lookup_book(&state, &isbn).await?;
    if !book.is_purchasable() {
        return Err(FormError::NotPurchasable(book.title).into());
    }
    let quantity = query.quantity.and_then(|value| value.trim().parse::<u32>().ok());
    let toast = state.toast(&session.id).await;
    let page = Html(render_purchase(&purchase_summary(&book, quantity), toast.as_ref()));
    Ok((session, page))
}

pub async fn add_book(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddBookForm>,
) -> (Session, Redirect) {
    state.update(&session.id, |view| view.with_tab(Tab::Add)).await;
    // The outcome is reported through the toast either way.
    let _ = forms::submit_add(&state, &session.id, &form).await;
    (session, Redirect::to("/"))
}

pub async fn purchase(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PurchaseForm>,
) -> (Session, Redirect) {
    let redirect = match forms::submit_purchase(&state, &session.id, &form).await {
        Ok(_) => {
            state.update(&session.id, |view| view.with_tab(Tab::Browse)).await;
            Redirect::to("/")
        }
        Err(_) => match form.isbn.as_deref().map(str::trim).filter(|isbn| !isbn.is_empty()) {
            Some(isbn) => Redirect::to(&format!("/books/{}/buy", urlencoding::encode(isbn))),
            None => Redirect::to("/"),
        },
    };
    (session, redirect)
}

pub async fn remove_outdated(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OutdatedForm>,
) -> (Session, Redirect) {
    state.update(&session.id, |view| view.with_tab(Tab::Manage)).await;
    let _ = forms::submit_remove_outdated(&state, &session.id, &form).await;
    (session, Redirect::to("/"))
}
