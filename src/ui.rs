use crate::filter::Filter;
use crate::models::{Book, BookType, Tab};
use crate::notifier::Toast;
use crate::render::{
    self, BookCard, CardAction, Grid, PurchaseSummary, EMPTY_TEXT, FAILED_TEXT,
};
use crate::stats::InventoryStats;
use crate::state::ViewState;

pub fn render_index(view: &ViewState, stats: &InventoryStats, toast: Option<&Toast>) -> String {
    let content = match view.tab() {
        Tab::Browse => browse_section(view),
        Tab::Add => add_section(view.book_type()),
        Tab::Manage => manage_section(stats),
    };
    layout(view.tab(), toast, &content)
}

pub fn render_details(book: &Book, toast: Option<&Toast>) -> String {
    let rows: String = render::book_details(book)
        .into_iter()
        .map(|(label, value)| format!("<dt>{label}</dt><dd>{}</dd>", escape(&value)))
        .collect();
    let buy = if book.is_purchasable() {
        format!(
            r#"<a class="btn btn-primary" href="/books/{}/buy">Buy Now</a>"#,
            urlencoding::encode(&book.isbn)
        )
    } else {
        String::new()
    };
    let content = format!(
        r#"<section class="panel details">
      <h2>Book Details</h2>
      <dl>{rows}</dl>
      <div class="book-actions">{buy}<a class="btn btn-secondary" href="/?tab=browse">Back</a></div>
    </section>"#
    );
    layout(Tab::Browse, toast, &content)
}

pub fn render_purchase(summary: &PurchaseSummary, toast: Option<&Toast>) -> String {
    let available = summary
        .available
        .map(|units| format!("<p><strong>Available:</strong> {units} units</p>"))
        .unwrap_or_default();
    let address = if summary.needs_address {
        r#"<label>Shipping address<textarea name="address" required></textarea></label>"#
    } else {
        ""
    };
    let isbn = escape(&summary.isbn);
    let content = format!(
        r#"<section class="panel purchase">
      <h2>Purchase Book</h2>
      <div class="book-summary">
        <h3>{title}</h3>
        <p>by {author}</p>
        <p><strong>Price:</strong> {price}</p>
        {available}
      </div>
      <form method="get" action="/books/{segment}/buy" class="inline">
        <label>Quantity<input type="number" name="quantity" min="1" value="{quantity}" /></label>
        <button class="btn btn-secondary" type="submit">Update total</button>
      </form>
      <form method="post" action="/purchase">
        <input type="hidden" name="isbn" value="{isbn}" />
        <input type="hidden" name="quantity" value="{quantity}" />
        <label>Email<input type="email" name="email" required /></label>
        {address}
        <p class="total">Total: $<span id="totalAmount">{total}</span></p>
        <button class="btn btn-primary" type="submit">Complete Purchase</button>
        <a class="btn btn-secondary" href="/?tab=browse">Cancel</a>
      </form>
    </section>"#,
        title = escape(&summary.title),
        author = escape(&summary.author),
        price = summary.price,
        segment = urlencoding::encode(&summary.isbn),
        quantity = summary.quantity,
        total = summary.total,
    );
    layout(Tab::Browse, toast, &content)
}

fn layout(active: Tab, toast: Option<&Toast>, content: &str) -> String {
    let nav: String = Tab::ALL
        .into_iter()
        .map(|tab| {
            let class = if tab == active { "nav-btn active" } else { "nav-btn" };
            format!(
                r#"<a class="{class}" href="/?tab={}">{}</a>"#,
                tab.as_str(),
                tab.label()
            )
        })
        .collect();
    let toast = toast
        .map(|toast| {
            format!(
                r#"<div id="notification" class="notification {} show">{}</div>"#,
                toast.kind.as_str(),
                escape(&toast.message)
            )
        })
        .unwrap_or_default();

    PAGE_HTML
        .replace("{{NAV}}", &nav)
        .replace("{{TOAST}}", &toast)
        .replace("{{CONTENT}}", content)
}

fn browse_section(view: &ViewState) -> String {
    let filters: String = Filter::options()
        .map(|filter| {
            let class = if filter == view.filter() && view.search().trim().is_empty() {
                "filter-btn active"
            } else {
                "filter-btn"
            };
            format!(
                r#"<a class="{class}" href="/?filter={}&amp;q=">{}</a>"#,
                filter.as_str(),
                filter.label()
            )
        })
        .collect();

    format!(
        r#"<section class="panel browse">
      <form class="search" method="get" action="/">
        <input id="searchInput" type="search" name="q" value="{search}" placeholder="Search by title, author or ISBN" />
        <button class="btn btn-secondary" type="submit">Search</button>
      </form>
      <div class="filters">{filters}</div>
      <div id="booksGrid" class="books-grid">{grid}</div>
    </section>"#,
        search = escape(view.search()),
        grid = grid_html(&render::grid(view)),
    )
}

fn grid_html(grid: &Grid) -> String {
    match grid {
        Grid::Loading => r#"<div class="loading"><div class="spinner"></div></div>"#.to_string(),
        Grid::Failed => format!(r#"<p class="placeholder">{FAILED_TEXT}</p>"#),
        Grid::Empty => format!(r#"<p class="placeholder">{EMPTY_TEXT}</p>"#),
        Grid::Cards(cards) => cards.iter().map(card_html).collect(),
    }
}

fn card_html(card: &BookCard) -> String {
    let stock = card
        .stock
        .as_ref()
        .map(|badge| {
            format!(
                r#"<div class="stock-indicator {}">{}</div>"#,
                badge.level.css_class(),
                badge.text
            )
        })
        .unwrap_or_default();
    let segment = urlencoding::encode(&card.isbn);
    let action = match card.action {
        CardAction::Buy => format!(
            r#"<a class="btn btn-primary" href="/books/{segment}/buy">{}</a>"#,
            card.action.label()
        ),
        other => format!(
            r#"<button class="btn btn-secondary" disabled>{}</button>"#,
            other.label()
        ),
    };

    format!(
        r#"<div class="book-card" data-type="{type_label}">
        <div class="book-type {type_class}">{type_label}</div>
        <h3 class="book-title">{title}</h3>
        <p class="book-author">by {author}</p>
        <div class="book-details"><span>ISBN: {isbn}</span><span>Year: {year}</span></div>
        {stock}
        <div class="book-price">{price}</div>
        <div class="book-actions">{action}<a class="btn btn-secondary" href="/books/{segment}">Details</a></div>
      </div>"#,
        type_label = card.type_label,
        type_class = card.type_class,
        title = escape(&card.title),
        author = escape(&card.author),
        isbn = escape(&card.isbn),
        year = card.year,
        price = card.price,
    )
}

fn add_section(selected: BookType) -> String {
    let selector: String = BookType::ALL
        .into_iter()
        .map(|book_type| {
            let class = if book_type == selected { "book-type-btn active" } else { "book-type-btn" };
            format!(
                r#"<a class="{class}" href="/?tab=add&amp;type={}">{}</a>"#,
                book_type.as_str(),
                book_type.label()
            )
        })
        .collect();

    let extra = match selected {
        BookType::Paper => concat!(
            r#"<label class="price-group">Price<input type="number" name="price" min="0" step="0.01" required /></label>"#,
            r#"<label class="stock-group">Stock<input type="number" name="stock" min="0" required /></label>"#
        ),
        BookType::Ebook => concat!(
            r#"<label class="price-group">Price<input type="number" name="price" min="0" step="0.01" required /></label>"#,
            r#"<label class="filetype-group">File type<select name="fileType"><option>PDF</option><option>EPUB</option><option>MOBI</option></select></label>"#
        ),
        BookType::Showcase => "",
    };

    format!(
        r#"<section class="panel add">
      <div class="book-type-selector">{selector}</div>
      <form id="addBookForm" method="post" action="/books">
        <input type="hidden" name="bookType" value="{book_type}" />
        <label>ISBN<input name="isbn" required /></label>
        <label>Title<input name="title" required /></label>
        <label>Author<input name="author" required /></label>
        <label>Year published<input type="number" name="yearPublished" required /></label>
        {extra}
        <button class="btn btn-primary" type="submit">Add Book</button>
      </form>
    </section>"#,
        book_type = selected.as_str(),
    )
}

fn manage_section(stats: &InventoryStats) -> String {
    let items = [
        (stats.total.to_string(), "Total Books"),
        (stats.paper_books.to_string(), "Paper Books"),
        (stats.ebooks.to_string(), "E-Books"),
        (stats.showcase.to_string(), "Showcase Books"),
        (stats.total_stock.to_string(), "Total Stock"),
        (format!("${:.0}", stats.total_value), "Inventory Value"),
    ];
    let stats_html: String = items
        .iter()
        .map(|(number, label)| {
            format!(
                r#"<div class="stat-item"><div class="stat-number">{number}</div><div class="stat-label">{label}</div></div>"#
            )
        })
        .collect();

    format!(
        r#"<section class="panel manage">
      <div id="inventoryStats" class="stats">{stats_html}</div>
      <form method="post" action="/outdated">
        <label>Remove books older than (years)<input id="yearsThreshold" type="number" name="years" min="1" /></label>
        <button class="btn btn-danger" type="submit">Remove Outdated</button>
      </form>
    </section>"#
    )
}

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Quantum Book Store</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #24303c;
      --accent: #3b6ea5;
      --card: #ffffff;
      --muted: #6b7280;
      --shadow: 0 12px 32px rgba(36, 48, 60, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
    }

    header {
      padding: 24px 32px 8px;
    }

    nav {
      display: flex;
      gap: 8px;
      padding: 0 32px 16px;
    }

    main {
      padding: 0 32px 48px;
    }

    a.nav-btn, a.filter-btn, a.book-type-btn {
      padding: 8px 16px;
      border-radius: 999px;
      color: var(--ink);
      text-decoration: none;
      background: rgba(59, 110, 165, 0.08);
    }

    a.active {
      background: var(--accent);
      color: white;
    }

    .panel {
      display: grid;
      gap: 16px;
    }

    .filters, .book-type-selector {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .books-grid, .stats {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
      gap: 16px;
    }

    .book-card, .stat-item, .book-summary, .details dl {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 18px;
    }

    .book-type {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .book-details {
      display: flex;
      justify-content: space-between;
      color: var(--muted);
      font-size: 0.85rem;
    }

    .stock-high { color: #2f855a; }
    .stock-medium { color: #b7791f; }
    .stock-low { color: #c05621; }
    .stock-out { color: #c53030; }

    .book-price {
      font-size: 1.3rem;
      font-weight: 600;
      margin: 8px 0;
    }

    .btn {
      display: inline-block;
      border: none;
      border-radius: 8px;
      padding: 8px 14px;
      font-size: 0.9rem;
      cursor: pointer;
      text-decoration: none;
      margin-right: 6px;
    }

    .btn-primary { background: var(--accent); color: white; }
    .btn-secondary { background: #e5e7eb; color: var(--ink); }
    .btn-danger { background: #c53030; color: white; }

    form {
      display: grid;
      gap: 10px;
      max-width: 520px;
    }

    form.search, form.inline {
      display: flex;
      max-width: none;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.9rem;
    }

    input, select, textarea {
      padding: 8px 10px;
      border-radius: 8px;
      border: 1px solid #d1d5db;
      font: inherit;
    }

    .placeholder {
      text-align: center;
      color: #666;
    }

    .stat-number {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent);
    }

    .notification {
      position: fixed;
      right: 24px;
      bottom: 24px;
      padding: 14px 18px;
      border-radius: 10px;
      color: white;
      background: var(--accent);
      animation: dismiss 5s forwards;
    }

    .notification.success { background: #2f855a; }
    .notification.error { background: #c53030; }
    .notification.info { background: var(--accent); }

    @keyframes dismiss {
      0%, 90% { opacity: 1; }
      100% { opacity: 0; visibility: hidden; }
    }
  </style>
</head>
<body>
  <header>
    <h1>Quantum Book Store</h1>
  </header>
  <nav>{{NAV}}</nav>
  <main>
    {{CONTENT}}
  </main>
  {{TOAST}}
</body>
</html>
"#;
