use crate::models::{Book, BookType};
use serde::{Serialize, Serializer};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(BookType),
}

impl Filter {
    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Only(book_type) => book_type.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All Books",
            Filter::Only(book_type) => book_type.label(),
        }
    }

    pub fn matches(self, book: &Book) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(book_type) => book.book_type() == book_type,
        }
    }

    pub fn options() -> impl Iterator<Item = Filter> {
        std::iter::once(Filter::All).chain(BookType::ALL.into_iter().map(Filter::Only))
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(Filter::All),
            other => other
                .parse::<BookType>()
                .map(Filter::Only)
                .map_err(|_| format!("unknown filter '{other}'")),
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn filter_books(books: &[Book], filter: Filter) -> Vec<&Book> {
    books.iter().filter(|book| filter.matches(book)).collect()
}

/// Case-insensitive substring match on title, author or isbn.
pub fn search_books<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let needle = query.trim().to_lowercase();
    books
        .iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&needle)
                || book.author.to_lowercase().contains(&needle)
                || book.isbn.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Books to display. A non-blank search runs over the whole list and
/// ignores the filter; a blank one falls back to the filter.
pub fn visible<'a>(books: &'a [Book], filter: Filter, search: &str) -> Vec<&'a Book> {
    if search.trim().is_empty() {
        filter_books(books, filter)
    } else {
        search_books(books, search)
    }
}
