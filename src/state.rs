use crate::client::BookApi;
use crate::filter::{self, Filter};
use crate::models::{Book, BookType, Tab};
use crate::notifier::{Notifier, Toast, ToastKind};
use crate::session::SessionId;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Sessions idle for longer than this are forgotten.
pub const SESSION_IDLE_MINS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

/// The fetched book list and how the latest fetch went. Shared by every
/// session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Arc<Vec<Book>>,
    status: LoadStatus,
}

impl Catalog {
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn find(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn == isbn)
    }

    pub fn loading(self) -> Self {
        Self {
            status: LoadStatus::Loading,
            ..self
        }
    }

    /// Replaces the book list wholesale.
    pub fn loaded(self, books: Vec<Book>) -> Self {
        Self {
            books: Arc::new(books),
            status: LoadStatus::Loaded,
        }
    }

    /// Keeps the last good list so details and stats stay available.
    pub fn failed(self, message: impl Into<String>) -> Self {
        Self {
            status: LoadStatus::Failed(message.into()),
            ..self
        }
    }
}

/// What one browser has picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    tab: Tab,
    book_type: BookType,
    filter: Filter,
    search: String,
}

/// Everything the page is rendered from: the shared catalog seen through one
/// session's selection.
///
/// Never mutated in place: each UI event yields a new value.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    catalog: Catalog,
    selection: Selection,
}

impl ViewState {
    pub fn books(&self) -> &[Book] {
        self.catalog.books()
    }

    pub fn status(&self) -> &LoadStatus {
        self.catalog.status()
    }

    pub fn tab(&self) -> Tab {
        self.selection.tab
    }

    pub fn book_type(&self) -> BookType {
        self.selection.book_type
    }

    pub fn filter(&self) -> Filter {
        self.selection.filter
    }

    pub fn search(&self) -> &str {
        &self.selection.search
    }

    pub fn find(&self, isbn: &str) -> Option<&Book> {
        self.catalog.find(isbn)
    }

    pub fn visible_books(&self) -> Vec<&Book> {
        filter::visible(self.catalog.books(), self.selection.filter, &self.selection.search)
    }

    pub fn with_tab(self, tab: Tab) -> Self {
        self.select(|selection| Selection { tab, ..selection })
    }

    pub fn with_book_type(self, book_type: BookType) -> Self {
        self.select(|selection| Selection { book_type, ..selection })
    }

    pub fn with_filter(self, filter: Filter) -> Self {
        self.select(|selection| Selection { filter, ..selection })
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.select(|selection| Selection { search, ..selection })
    }

    pub fn loading(self) -> Self {
        self.with_catalog(Catalog::loading)
    }

    pub fn loaded(self, books: Vec<Book>) -> Self {
        self.with_catalog(|catalog| catalog.loaded(books))
    }

    pub fn failed(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.with_catalog(|catalog| catalog.failed(message))
    }

    fn select(self, next: impl FnOnce(Selection) -> Selection) -> Self {
        Self {
            selection: next(self.selection),
            ..self
        }
    }

    fn with_catalog(self, next: impl FnOnce(Catalog) -> Catalog) -> Self {
        Self {
            catalog: next(self.catalog),
            ..self
        }
    }
}

/// The shared catalog plus the generation of the newest load. Results of
/// older loads are discarded so a slow fetch cannot overwrite a newer list.
#[derive(Debug, Default)]
struct CatalogSlot {
    catalog: Catalog,
    generation: u64,
}

impl CatalogSlot {
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.catalog = self.catalog.clone().loading();
        self.generation
    }

    fn finish(&mut self, generation: u64, outcome: Result<Vec<Book>, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        let catalog = self.catalog.clone();
        self.catalog = match outcome {
            Ok(books) => catalog.loaded(books),
            Err(message) => catalog.failed(message),
        };
        true
    }
}

#[derive(Debug)]
struct SessionState {
    selection: Selection,
    notifier: Notifier,
    last_seen: DateTime<Utc>,
}

impl SessionState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            selection: Selection::default(),
            notifier: Notifier::default(),
            last_seen: now,
        }
    }
}

type Sessions = HashMap<SessionId, SessionState>;

fn session_mut<'a>(sessions: &'a mut Sessions, id: &SessionId) -> &'a mut SessionState {
    let now = Utc::now();
    if !sessions.contains_key(id) {
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_seen < Duration::minutes(SESSION_IDLE_MINS));
        if sessions.len() < before {
            debug!("forgot {} idle sessions", before - sessions.len());
        }
    }
    let session = sessions
        .entry(id.clone())
        .or_insert_with(|| SessionState::new(now));
    session.last_seen = now;
    session
}

#[derive(Clone)]
pub struct AppState {
    pub api: BookApi,
    catalog: Arc<Mutex<CatalogSlot>>,
    sessions: Arc<Mutex<Sessions>>,
}

impl AppState {
    pub fn new(api: BookApi) -> Self {
        Self {
            api,
            catalog: Arc::new(Mutex::new(CatalogSlot::default())),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn catalog(&self) -> Catalog {
        self.catalog.lock().await.catalog.clone()
    }

    pub async fn view(&self, session: &SessionId) -> ViewState {
        let catalog = self.catalog().await;
        let selection = session_mut(&mut *self.sessions.lock().await, session)
            .selection
            .clone();
        ViewState { catalog, selection }
    }

    /// Derives the session's next view from its latest one. Only the
    /// selection is kept; the catalog changes through loads alone.
    pub async fn update(
        &self,
        session: &SessionId,
        next: impl FnOnce(ViewState) -> ViewState,
    ) -> ViewState {
        let catalog = self.catalog().await;
        let mut sessions = self.sessions.lock().await;
        let entry = session_mut(&mut sessions, session);
        let updated = next(ViewState {
            catalog,
            selection: entry.selection.clone(),
        });
        entry.selection = updated.selection.clone();
        updated
    }

    /// Marks the catalog as loading and returns the generation of this load.
    pub async fn begin_load(&self) -> u64 {
        self.catalog.lock().await.begin()
    }

    /// Publishes a load result. Returns `false` when a newer load has
    /// started since, in which case the result is dropped.
    pub async fn finish_load(&self, generation: u64, outcome: Result<Vec<Book>, String>) -> bool {
        self.catalog.lock().await.finish(generation, outcome)
    }

    pub async fn notify(&self, session: &SessionId, kind: ToastKind, message: impl Into<String>) {
        session_mut(&mut *self.sessions.lock().await, session)
            .notifier
            .show(kind, message);
    }

    pub async fn toast(&self, session: &SessionId) -> Option<Toast> {
        session_mut(&mut *self.sessions.lock().await, session)
            .notifier
            .current(Utc::now())
    }
}
