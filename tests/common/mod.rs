//! A stand-in for the bookstore REST API, seeded with five books.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bookstore_view::models::{Book, BookKind};
use chrono::{Datelike, Local};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub type Inventory = Arc<Mutex<Vec<Book>>>;

pub fn sample_books() -> Vec<Book> {
    let book = |isbn: &str, title: &str, author: &str, year: i32, price: f64, kind: BookKind| Book {
        isbn: isbn.into(),
        title: title.into(),
        author: author.into(),
        year_published: year,
        price,
        available_for_purchase: Some(match kind {
            BookKind::Physical { stock } => stock > 0,
            BookKind::Digital { .. } => true,
            BookKind::Demo => false,
        }),
        kind,
    };
    vec![
        book("ISBN-001", "Java: The Complete Reference", "Herbert Schildt", 2022, 59.99, BookKind::Physical { stock: 25 }),
        book("ISBN-002", "Spring Boot in Action", "Craig Walls", 2021, 39.99, BookKind::Digital { file_type: "PDF".into() }),
        book("ISBN-003", "Future of AI Programming", "Tech Innovator", 2024, 0.0, BookKind::Demo),
        book("ISBN-004", "Clean Code", "Robert C. Martin", 2020, 49.99, BookKind::Physical { stock: 15 }),
        book("ISBN-005", "Design Patterns", "Gang of Four", 2019, 44.99, BookKind::Digital { file_type: "EPUB".into() }),
    ]
}

pub fn router(inventory: Inventory) -> Router {
    Router::new()
        .route("/api/books", get(list))
        .route("/api/books/*rest", get(get_one).post(post_any).delete(delete_any))
        .with_state(inventory)
}

/// Serves the fake API on the current runtime; returns its books base URL.
pub async fn spawn_local(inventory: Inventory) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(inventory)).await.unwrap();
    });
    format!("http://{addr}/api/books")
}

/// Serves the fake API from its own thread so it outlives any single test
/// runtime.
pub fn spawn_detached(inventory: Inventory) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router(inventory)).await.unwrap();
        });
    });
    let addr = rx.recv().unwrap();
    format!("http://{addr}/api/books")
}

pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn list(State(inventory): State<Inventory>) -> Json<Vec<Book>> {
    Json(inventory.lock().unwrap().clone())
}

async fn get_one(State(inventory): State<Inventory>, Path(rest): Path<String>) -> Response {
    let isbn = rest.trim_start_matches('/');
    match inventory.lock().unwrap().iter().find(|book| book.isbn == isbn) {
        Some(book) => Json(book.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

async fn post_any(
    State(inventory): State<Inventory>,
    Path(rest): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let segment = rest.trim_start_matches('/');
    if segment == "buy" {
        return buy(&inventory, &body);
    }

    let kind = match segment {
        "paper" => body
            .get("stock")
            .and_then(Value::as_u64)
            .map(|stock| BookKind::Physical { stock: stock as u32 }),
        "ebook" => text_field(&body, "fileType").map(|file_type| BookKind::Digital { file_type }),
        "showcase" => Some(BookKind::Demo),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    let (Some(kind), Some(isbn), Some(title), Some(author), Some(year)) = (
        kind,
        text_field(&body, "isbn"),
        text_field(&body, "title"),
        text_field(&body, "author"),
        body.get("yearPublished").and_then(Value::as_i64),
    ) else {
        return (StatusCode::BAD_REQUEST, "Error: malformed book").into_response();
    };

    let price = if segment == "showcase" {
        0.0
    } else {
        body.get("price").and_then(Value::as_f64).unwrap_or(0.0)
    };
    let message = match segment {
        "paper" => "Paper book added successfully",
        "ebook" => "EBook added successfully",
        _ => "Showcase book added successfully",
    };

    let mut books = inventory.lock().unwrap();
    if !books.iter().any(|book| book.isbn == isbn) {
        books.push(Book {
            isbn,
            title,
            author,
            year_published: year as i32,
            price,
            available_for_purchase: None,
            kind,
        });
    }
    message.into_response()
}

fn buy(inventory: &Inventory, body: &Value) -> Response {
    let reject = |message: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": format!("Error: {message}"), "amount": 0.0 })),
        )
            .into_response()
    };

    let isbn = text_field(body, "isbn").unwrap_or_default();
    let quantity = body.get("quantity").and_then(Value::as_u64).unwrap_or(0) as u32;
    let mut books = inventory.lock().unwrap();
    let Some(book) = books.iter_mut().find(|book| book.isbn == isbn) else {
        return reject(format!("Quantum book store - Book with ISBN {isbn} not found"));
    };

    match &mut book.kind {
        BookKind::Demo => {
            return reject(format!(
                "Quantum book store - Book '{}' is not available for purchase",
                book.title
            ));
        }
        BookKind::Physical { stock } => {
            if quantity > *stock {
                return reject(format!(
                    "Quantum book store - Insufficient stock. Available: {stock}, Requested: {quantity}"
                ));
            }
            *stock -= quantity;
        }
        BookKind::Digital { .. } => {}
    }

    Json(json!({
        "message": "Purchase successful! Thank you for shopping with Quantum Book Store.",
        "amount": book.price * f64::from(quantity),
    }))
    .into_response()
}

async fn delete_any(State(inventory): State<Inventory>, Path(rest): Path<String>) -> Response {
    let Some(years) = rest
        .trim_start_matches('/')
        .strip_prefix("outdated/")
        .and_then(|years| years.parse::<i32>().ok())
    else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let current_year = Local::now().year();
    let mut books = inventory.lock().unwrap();
    let (removed, kept): (Vec<Book>, Vec<Book>) = books
        .drain(..)
        .partition(|book| current_year - book.year_published > years);
    *books = kept;
    Json(removed).into_response()
}
