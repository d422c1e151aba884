//! Thin client for the bookstore REST API.
//!
//! Each call is a single request/response exchange. Non-success responses
//! become [`ApiError::Rejected`] carrying the server's own message so it can
//! be surfaced to the user unchanged.

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{Book, NewBook, PurchaseReceipt, PurchaseRequest};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Clone)]
pub struct BookApi {
    http: Client,
    base: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl BookApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(http, &config.api_base))
    }

    pub fn with_client(http: Client, base: &str) -> Self {
        Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        debug!("GET {}", self.base);
        let response = self.http.get(&self.base).send().await?;
        let body = success_text(response, "Failed to load books").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `Ok(None)` when the server does not know the ISBN.
    pub async fn get_book(&self, isbn: &str) -> Result<Option<Book>, ApiError> {
        let url = format!("{}/{}", self.base, urlencoding::encode(isbn));
        debug!("GET {url}");
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = success_text(response, "Failed to load book").await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Returns the server's confirmation text.
    pub async fn add_book(&self, book: &NewBook) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.base, book.book_type());
        info!("adding {} book {}", book.book_type(), book.isbn());
        let request = self.http.post(&url);
        let request = match book {
            NewBook::Paper(payload) => request.json(payload),
            NewBook::Ebook(payload) => request.json(payload),
            NewBook::Showcase(payload) => request.json(payload),
        };
        let response = request.send().await?;
        success_text(response, "Failed to add book").await
    }

    pub async fn buy_book(&self, purchase: &PurchaseRequest) -> Result<PurchaseReceipt, ApiError> {
        let url = format!("{}/buy", self.base);
        info!("buying {} x {}", purchase.quantity, purchase.isbn);
        let response = self.http.post(&url).json(purchase).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|error| error.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback_message(&body, "Purchase failed"));
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Returns the books the server removed.
    pub async fn remove_outdated(&self, years: u32) -> Result<Vec<Book>, ApiError> {
        let url = format!("{}/outdated/{years}", self.base);
        info!("removing books older than {years} years");
        let response = self.http.delete(&url).send().await?;
        let body = success_text(response, "Failed to remove outdated books").await?;
        Ok(serde_json::from_str(&body)?)
    }
}

async fn success_text(response: Response, fallback: &str) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message: fallback_message(&body, fallback),
    })
}

fn fallback_message(body: &str, fallback: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        fallback.to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_loses_trailing_slash() {
        let api = BookApi::with_client(Client::new(), "http://localhost:8081/api/books/");
        assert_eq!(api.base(), "http://localhost:8081/api/books");
    }

    #[test]
    fn empty_error_body_uses_fallback() {
        assert_eq!(fallback_message("  ", "Failed to load books"), "Failed to load books");
        assert_eq!(fallback_message("Error: boom", "Failed"), "Error: boom");
    }
}
