//! Add-book, purchase and remove-outdated submissions.
//!
//! Each submission is validated locally, sent as one request, reported
//! through a toast and followed by a reload of the book list on success.

use crate::errors::{FormError, SubmitError};
use crate::loader::{find_book, load_books};
use crate::models::{
    Book, BookKind, BookType, EBookRequest, NewBook, PaperBookRequest, PurchaseReceipt,
    PurchaseRequest, ShowcaseBookRequest,
};
use crate::notifier::ToastKind;
use crate::session::SessionId;
use crate::state::AppState;
use serde::Deserialize;
use tracing::{error, info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBookForm {
    pub book_type: Option<String>,
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year_published: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PurchaseForm {
    pub isbn: Option<String>,
    pub quantity: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutdatedForm {
    pub years: Option<String>,
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, FormError> {
    text(value)
        .map(str::to_string)
        .ok_or(FormError::Missing(field))
}

fn whole_number<T: std::str::FromStr>(
    value: &Option<String>,
    field: &'static str,
    expected: &'static str,
) -> Result<T, FormError> {
    text(value)
        .ok_or(FormError::Missing(field))?
        .parse::<T>()
        .map_err(|_| FormError::Invalid { field, expected })
}

fn price(value: &Option<String>) -> Result<f64, FormError> {
    let parsed: f64 = text(value)
        .ok_or(FormError::Missing("price"))?
        .parse()
        .map_err(|_| FormError::Invalid {
            field: "price",
            expected: "a non-negative amount",
        })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(FormError::Invalid {
            field: "price",
            expected: "a non-negative amount",
        });
    }
    Ok(parsed)
}

impl AddBookForm {
    /// `selected` is used when the form itself does not name a type.
    pub fn validate(&self, selected: BookType) -> Result<NewBook, FormError> {
        let book_type = match text(&self.book_type) {
            Some(value) => value.parse::<BookType>().map_err(|_| FormError::Invalid {
                field: "bookType",
                expected: "paper, ebook or showcase",
            })?,
            None => selected,
        };

        let isbn = required(&self.isbn, "isbn")?;
        let title = required(&self.title, "title")?;
        let author = required(&self.author, "author")?;
        let year_published = whole_number(&self.year_published, "yearPublished", "a whole year")?;

        Ok(match book_type {
            BookType::Paper => NewBook::Paper(PaperBookRequest {
                isbn,
                title,
                author,
                year_published,
                price: price(&self.price)?,
                stock: whole_number(&self.stock, "stock", "a whole number of copies")?,
            }),
            BookType::Ebook => NewBook::Ebook(EBookRequest {
                isbn,
                title,
                author,
                year_published,
                price: price(&self.price)?,
                file_type: required(&self.file_type, "fileType")?,
            }),
            BookType::Showcase => NewBook::Showcase(ShowcaseBookRequest {
                isbn,
                title,
                author,
                year_published,
            }),
        })
    }
}

impl PurchaseForm {
    /// `book` is the matching record, when the list or the server knows it.
    pub fn validate(&self, book: Option<&Book>) -> Result<PurchaseRequest, FormError> {
        let isbn = required(&self.isbn, "isbn")?;
        if let Some(book) = book.filter(|book| !book.is_purchasable()) {
            return Err(FormError::NotPurchasable(book.title.clone()));
        }

        let quantity: u32 = whole_number(&self.quantity, "quantity", "a whole number of at least 1")?;
        if quantity == 0 {
            return Err(FormError::Invalid {
                field: "quantity",
                expected: "a whole number of at least 1",
            });
        }

        let email = required(&self.email, "email")?;
        let ships = book.is_some_and(|book| matches!(book.kind, BookKind::Physical { .. }));
        let address = if ships {
            required(&self.address, "address")?
        } else {
            text(&self.address).unwrap_or_default().to_string()
        };

        Ok(PurchaseRequest {
            isbn,
            quantity,
            email,
            address,
        })
    }
}

impl OutdatedForm {
    pub fn years(&self) -> Result<u32, FormError> {
        text(&self.years)
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|years| *years >= 1)
            .ok_or(FormError::YearsThreshold)
    }
}

async fn report(
    state: &AppState,
    session: &SessionId,
    what: &str,
    err: SubmitError,
) -> SubmitError {
    match &err {
        SubmitError::Form(reason) => warn!("{what} rejected: {reason}"),
        SubmitError::Api(reason) => error!("error {what}: {reason}"),
    }
    state.notify(session, ToastKind::Error, err.to_string()).await;
    err
}

pub async fn submit_add(
    state: &AppState,
    session: &SessionId,
    form: &AddBookForm,
) -> Result<String, SubmitError> {
    let selected = state.view(session).await.book_type();
    let result = match form.validate(selected) {
        Ok(book) => state.api.add_book(&book).await.map_err(SubmitError::from),
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(message) => {
            info!("{message}");
            state.notify(session, ToastKind::Success, message.clone()).await;
            load_books(state, session).await;
            Ok(message)
        }
        Err(err) => Err(report(state, session, "adding book", err).await),
    }
}

async fn purchase(state: &AppState, form: &PurchaseForm) -> Result<PurchaseReceipt, SubmitError> {
    let book = match text(&form.isbn) {
        Some(isbn) => find_book(state, isbn).await?,
        None => None,
    };
    let request = form.validate(book.as_ref())?;
    Ok(state.api.buy_book(&request).await?)
}

pub async fn submit_purchase(
    state: &AppState,
    session: &SessionId,
    form: &PurchaseForm,
) -> Result<String, SubmitError> {
    match purchase(state, form).await {
        Ok(receipt) => {
            let message = format!("{} Amount paid: ${:.2}", receipt.message, receipt.amount);
            info!("purchase completed, amount ${:.2}", receipt.amount);
            state.notify(session, ToastKind::Success, message.clone()).await;
            load_books(state, session).await;
            Ok(message)
        }
        Err(err) => Err(report(state, session, "processing purchase", err).await),
    }
}

pub async fn submit_remove_outdated(
    state: &AppState,
    session: &SessionId,
    form: &OutdatedForm,
) -> Result<String, SubmitError> {
    let result = match form.years() {
        Ok(years) => state.api.remove_outdated(years).await.map_err(SubmitError::from),
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(removed) => {
            let message = format!("Removed {} outdated books", removed.len());
            info!("{message}");
            let kind = if removed.is_empty() { ToastKind::Info } else { ToastKind::Success };
            state.notify(session, kind, message.clone()).await;
            load_books(state, session).await;
            Ok(message)
        }
        Err(err) => Err(report(state, session, "removing outdated books", err).await),
    }
}
