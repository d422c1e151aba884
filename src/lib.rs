pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod filter;
pub mod forms;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod notifier;
pub mod render;
pub mod session;
pub mod stats;
pub mod ui;
pub mod state;

pub use app::router;
pub use client::BookApi;
pub use config::Config;
pub use state::{AppState, ViewState};
