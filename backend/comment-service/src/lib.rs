pub mod app;
pub mod config;
pub mod elasticsearch;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;

pub use app::{build_router, AppState};
pub use elasticsearch::ElasticsearchClient;
