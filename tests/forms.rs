mod common;

use bookstore_view::errors::{FormError, SubmitError};
use bookstore_view::forms::{submit_purchase, PurchaseForm};
use bookstore_view::notifier::ToastKind;
use bookstore_view::session::SessionId;
use bookstore_view::{AppState, BookApi};
use common::{sample_books, spawn_local, Inventory};
use reqwest::Client;
use std::sync::{Arc, Mutex};

async fn state() -> (AppState, Inventory) {
    let inventory: Inventory = Arc::new(Mutex::new(sample_books()));
    let base = spawn_local(Arc::clone(&inventory)).await;
    (AppState::new(BookApi::with_client(Client::new(), &base)), inventory)
}

fn form(isbn: &str, address: Option<&str>) -> PurchaseForm {
    PurchaseForm {
        isbn: Some(isbn.into()),
        quantity: Some("1".into()),
        email: Some("reader@example.com".into()),
        address: address.map(str::to_string),
    }
}

fn stock_of(inventory: &Inventory, isbn: &str) -> Option<u32> {
    inventory
        .lock()
        .unwrap()
        .iter()
        .find(|book| book.isbn == isbn)
        .and_then(|book| book.stock())
}

#[tokio::test]
async fn uncached_paper_book_still_needs_an_address() {
    let (state, inventory) = state().await;
    let session = SessionId::random();
    assert!(state.catalog().await.books().is_empty());

    let err = submit_purchase(&state, &session, &form("ISBN-004", None))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Form(FormError::Missing("address"))), "{err:?}");
    assert_eq!(stock_of(&inventory, "ISBN-004"), Some(15));

    let toast = state.toast(&session).await.unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "address is required");
}

#[tokio::test]
async fn uncached_demo_book_is_refused_locally() {
    let (state, _) = state().await;
    let session = SessionId::random();

    let err = submit_purchase(&state, &session, &form("ISBN-003", Some("1 Main St")))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Form(FormError::NotPurchasable(_))), "{err:?}");
}

#[tokio::test]
async fn successful_purchase_reloads_and_toasts_only_the_buyer() {
    let (state, inventory) = state().await;
    let buyer = SessionId::random();
    let bystander = SessionId::random();

    let message = submit_purchase(&state, &buyer, &form("ISBN-002", None))
        .await
        .unwrap();
    assert!(message.ends_with("Amount paid: $39.99"), "{message}");

    let catalog = state.catalog().await;
    assert_eq!(catalog.books().len(), inventory.lock().unwrap().len());
    assert_eq!(state.toast(&buyer).await.unwrap().kind, ToastKind::Success);
    assert!(state.toast(&bystander).await.is_none());
}
