//! Business logic between the HTTP handlers and the repositories.

pub mod book_service;
pub mod llm_client;
pub mod user_service;
