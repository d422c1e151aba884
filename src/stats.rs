use crate::models::{Book, BookKind};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total: usize,
    pub paper_books: usize,
    pub ebooks: usize,
    pub showcase: usize,
    pub total_stock: u64,
    pub total_value: f64,
}

/// Physical books count at `price * stock`; every other book counts once.
pub fn build_stats(books: &[Book]) -> InventoryStats {
    let mut stats = InventoryStats {
        total: books.len(),
        ..InventoryStats::default()
    };

    for book in books {
        match book.kind {
            BookKind::Physical { stock } => {
                stats.paper_books += 1;
                stats.total_stock = stats.total_stock.saturating_add(u64::from(stock));
                stats.total_value += book.price * f64::from(stock);
            }
            BookKind::Digital { .. } => {
                stats.ebooks += 1;
                stats.total_value += book.price;
            }
            BookKind::Demo => {
                stats.showcase += 1;
                stats.total_value += book.price;
            }
        }
    }

    stats
}
