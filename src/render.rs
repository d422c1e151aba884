//! Pure projections from book records to display fragments.
//!
//! Nothing here knows about HTML; `ui` turns fragments into markup.

use crate::models::{Book, BookKind};
use crate::state::{LoadStatus, ViewState};
use serde::Serialize;

pub const EMPTY_TEXT: &str = "No books found.";
pub const FAILED_TEXT: &str = "Failed to load books. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    High,
    Medium,
    Low,
    Out,
}

impl StockLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            StockLevel::High => "stock-high",
            StockLevel::Medium => "stock-medium",
            StockLevel::Low => "stock-low",
            StockLevel::Out => "stock-out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockBadge {
    pub level: StockLevel,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CardAction {
    Buy,
    DemoOnly,
    OutOfStock,
}

impl CardAction {
    pub fn label(self) -> &'static str {
        match self {
            CardAction::Buy => "Buy Now",
            CardAction::DemoOnly => "Demo Only",
            CardAction::OutOfStock => "Out of Stock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookCard {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub type_label: &'static str,
    pub type_class: String,
    pub stock: Option<StockBadge>,
    pub price: String,
    pub action: CardAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Grid {
    Loading,
    Failed,
    Empty,
    Cards(Vec<BookCard>),
}

pub fn stock_badge(book: &Book) -> Option<StockBadge> {
    let stock = book.stock()?;
    let (level, text) = match stock {
        s if s > 20 => (StockLevel::High, format!("{s} in stock")),
        s if s > 10 => (StockLevel::Medium, format!("{s} in stock")),
        s if s > 0 => (StockLevel::Low, format!("Only {s} left")),
        _ => (StockLevel::Out, "Out of Stock".to_string()),
    };
    Some(StockBadge { level, text })
}

pub fn price_label(price: f64) -> String {
    if price > 0.0 {
        format_money(price)
    } else {
        "FREE (Demo)".to_string()
    }
}

pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn card_action(book: &Book) -> CardAction {
    if book.is_purchasable() {
        CardAction::Buy
    } else if book.price <= 0.0 {
        CardAction::DemoOnly
    } else {
        CardAction::OutOfStock
    }
}

/// Lowercase letters of the label: "Showcase/Demo Book" -> "showcasedemobook".
pub fn type_class(label: &str) -> String {
    label
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn book_card(book: &Book) -> BookCard {
    let type_label = book.book_type().label();
    BookCard {
        isbn: book.isbn.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        year: book.year_published,
        type_label,
        type_class: type_class(type_label),
        stock: stock_badge(book),
        price: price_label(book.price),
        action: card_action(book),
    }
}

pub fn grid(view: &ViewState) -> Grid {
    match view.status() {
        LoadStatus::Loading => Grid::Loading,
        LoadStatus::Failed(_) => Grid::Failed,
        LoadStatus::NotLoaded | LoadStatus::Loaded => {
            let cards: Vec<BookCard> = view.visible_books().into_iter().map(book_card).collect();
            if cards.is_empty() {
                Grid::Empty
            } else {
                Grid::Cards(cards)
            }
        }
    }
}

/// Label/value rows for the details page.
pub fn book_details(book: &Book) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Title", book.title.clone()),
        ("Author", book.author.clone()),
        ("ISBN", book.isbn.clone()),
        ("Year", book.year_published.to_string()),
        ("Price", format_money(book.price)),
        ("Type", book.book_type().label().to_string()),
    ];
    match &book.kind {
        BookKind::Physical { stock } => rows.push(("Stock", format!("{stock} units"))),
        BookKind::Digital { file_type } => rows.push(("File Type", file_type.clone())),
        BookKind::Demo => {}
    }
    rows
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseSummary {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub price: String,
    pub available: Option<u32>,
    pub quantity: u32,
    pub total: String,
    pub needs_address: bool,
}

/// Missing or invalid quantities count as one copy.
pub fn purchase_total(book: &Book, quantity: Option<u32>) -> f64 {
    book.price * f64::from(effective_quantity(quantity))
}

fn effective_quantity(quantity: Option<u32>) -> u32 {
    quantity.filter(|q| *q > 0).unwrap_or(1)
}

pub fn purchase_summary(book: &Book, quantity: Option<u32>) -> PurchaseSummary {
    PurchaseSummary {
        isbn: book.isbn.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        price: format_money(book.price),
        available: book.stock().filter(|stock| *stock > 0),
        quantity: effective_quantity(quantity),
        total: format!("{:.2}", purchase_total(book, quantity)),
        needs_address: matches!(book.kind, BookKind::Physical { .. }),
    }
}
