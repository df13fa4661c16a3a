//! HTTP request handlers.

pub mod ai_handler;
pub mod auth_handler;
pub mod books_handler;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::llm_client::TextGenerator;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub generator: Arc<dyn TextGenerator>,
}
