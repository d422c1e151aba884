use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A book record exactly as the bookstore API reports it.
///
/// The variant is carried by the `bookType` tag and passed through unchanged;
/// records without a known tag fail to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year_published: i32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_for_purchase: Option<bool>,
    #[serde(flatten)]
    pub kind: BookKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "bookType")]
pub enum BookKind {
    #[serde(rename = "Paper Book")]
    Physical {
        #[serde(deserialize_with = "stock_count")]
        stock: u32,
    },
    #[serde(rename = "EBook")]
    Digital {
        #[serde(rename = "fileType")]
        file_type: String,
    },
    #[serde(rename = "Showcase/Demo Book")]
    Demo,
}

/// The server does not validate stock, so a negative count is read as none
/// left rather than failing the whole list.
fn stock_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let stock = i64::deserialize(deserializer)?;
    Ok(u32::try_from(stock.max(0)).unwrap_or(u32::MAX))
}

impl BookKind {
    pub fn book_type(&self) -> BookType {
        match self {
            BookKind::Physical { .. } => BookType::Paper,
            BookKind::Digital { .. } => BookType::Ebook,
            BookKind::Demo => BookType::Showcase,
        }
    }
}

impl Book {
    pub fn book_type(&self) -> BookType {
        self.kind.book_type()
    }

    pub fn stock(&self) -> Option<u32> {
        match self.kind {
            BookKind::Physical { stock } => Some(stock),
            _ => None,
        }
    }

    pub fn file_type(&self) -> Option<&str> {
        match &self.kind {
            BookKind::Digital { file_type } => Some(file_type),
            _ => None,
        }
    }

    /// Demo books are never for sale. For the rest the server flag, when
    /// present, can only veto.
    pub fn is_purchasable(&self) -> bool {
        if self.available_for_purchase == Some(false) || self.price <= 0.0 {
            return false;
        }
        match self.kind {
            BookKind::Physical { stock } => stock > 0,
            BookKind::Digital { .. } => true,
            BookKind::Demo => false,
        }
    }
}

/// Selector used by the add form, the filter bar and the add endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    #[default]
    Paper,
    Ebook,
    Showcase,
}

impl BookType {
    pub const ALL: [BookType; 3] = [BookType::Paper, BookType::Ebook, BookType::Showcase];

    /// Path segment of the add endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            BookType::Paper => "paper",
            BookType::Ebook => "ebook",
            BookType::Showcase => "showcase",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookType::Paper => "Paper Book",
            BookType::Ebook => "EBook",
            BookType::Showcase => "Showcase/Demo Book",
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "paper" => Ok(BookType::Paper),
            "ebook" => Ok(BookType::Ebook),
            "showcase" => Ok(BookType::Showcase),
            other => Err(format!("unknown book type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Browse,
    Add,
    Manage,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Browse, Tab::Add, Tab::Manage];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Browse => "browse",
            Tab::Add => "add",
            Tab::Manage => "manage",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Browse => "Browse Books",
            Tab::Add => "Add Book",
            Tab::Manage => "Manage Inventory",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "browse" => Ok(Tab::Browse),
            "add" => Ok(Tab::Add),
            "manage" => Ok(Tab::Manage),
            other => Err(format!("unknown tab '{other}'")),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperBookRequest {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year_published: i32,
    pub price: f64,
    pub stock: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EBookRequest {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year_published: i32,
    pub price: f64,
    pub file_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseBookRequest {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year_published: i32,
}

/// A validated add-book submission, one payload shape per endpoint.
#[derive(Debug)]
pub enum NewBook {
    Paper(PaperBookRequest),
    Ebook(EBookRequest),
    Showcase(ShowcaseBookRequest),
}

impl NewBook {
    pub fn book_type(&self) -> BookType {
        match self {
            NewBook::Paper(_) => BookType::Paper,
            NewBook::Ebook(_) => BookType::Ebook,
            NewBook::Showcase(_) => BookType::Showcase,
        }
    }

    pub fn isbn(&self) -> &str {
        match self {
            NewBook::Paper(book) => &book.isbn,
            NewBook::Ebook(book) => &book.isbn,
            NewBook::Showcase(book) => &book.isbn,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PurchaseRequest {
    pub isbn: String,
    pub quantity: u32,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub message: String,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_tagged_variant() {
        let payload = r#"[
            {"isbn":"ISBN-001","title":"Java","author":"Herbert Schildt","yearPublished":2022,
             "price":59.99,"availableForPurchase":true,"bookType":"Paper Book","stock":25},
            {"isbn":"ISBN-002","title":"Spring Boot in Action","author":"Craig Walls","yearPublished":2021,
             "price":39.99,"bookType":"EBook","fileType":"PDF"},
            {"isbn":"ISBN-003","title":"Future of AI","author":"Tech Innovator","yearPublished":2024,
             "price":0.0,"availableForPurchase":false,"bookType":"Showcase/Demo Book"}
        ]"#;

        let books: Vec<Book> = serde_json::from_str(payload).unwrap();
        assert_eq!(books[0].kind, BookKind::Physical { stock: 25 });
        assert_eq!(books[0].available_for_purchase, Some(true));
        assert_eq!(books[1].file_type(), Some("PDF"));
        assert_eq!(books[1].available_for_purchase, None);
        assert_eq!(books[2].kind, BookKind::Demo);
        assert_eq!(books[2].book_type(), BookType::Showcase);
    }

    #[test]
    fn negative_stock_reads_as_out_of_stock() {
        let payload = r#"[
            {"isbn":"ISBN-010","title":"Miscounted","author":"Clerk","yearPublished":2020,
             "price":20.0,"bookType":"Paper Book","stock":-1},
            {"isbn":"ISBN-011","title":"Still Here","author":"Writer","yearPublished":2021,
             "price":15.0,"bookType":"EBook","fileType":"EPUB"}
        ]"#;

        let books: Vec<Book> = serde_json::from_str(payload).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].stock(), Some(0));
        assert!(!books[0].is_purchasable());
        assert_eq!(books[1].file_type(), Some("EPUB"));
    }

    #[test]
    fn untagged_record_is_rejected() {
        let payload = r#"{"isbn":"X","title":"T","author":"A","yearPublished":2020,"price":1.0,"stock":3}"#;
        assert!(serde_json::from_str::<Book>(payload).is_err());
    }

    #[test]
    fn serializes_tag_alongside_fields() {
        let book = Book {
            isbn: "ISBN-9".into(),
            title: "Rust".into(),
            author: "Ferris".into(),
            year_published: 2023,
            price: 10.0,
            available_for_purchase: None,
            kind: BookKind::Digital { file_type: "EPUB".into() },
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["bookType"], "EBook");
        assert_eq!(value["fileType"], "EPUB");
        assert_eq!(value["yearPublished"], 2023);
        assert!(value.get("availableForPurchase").is_none());
    }

    #[test]
    fn purchasability_rules() {
        let mut book = Book {
            isbn: "1".into(),
            title: "t".into(),
            author: "a".into(),
            year_published: 2020,
            price: 12.5,
            available_for_purchase: None,
            kind: BookKind::Physical { stock: 2 },
        };
        assert!(book.is_purchasable());

        book.kind = BookKind::Physical { stock: 0 };
        assert!(!book.is_purchasable());

        book.kind = BookKind::Digital { file_type: "PDF".into() };
        assert!(book.is_purchasable());
        book.available_for_purchase = Some(false);
        assert!(!book.is_purchasable());

        book.available_for_purchase = Some(true);
        book.kind = BookKind::Demo;
        assert!(!book.is_purchasable());
    }

    #[test]
    fn book_type_and_tab_parse() {
        assert_eq!("ebook".parse::<BookType>(), Ok(BookType::Ebook));
        assert!("magazine".parse::<BookType>().is_err());
        assert_eq!(" manage ".parse::<Tab>(), Ok(Tab::Manage));
        assert!("cart".parse::<Tab>().is_err());
    }
}
