//! Book catalog REST service.
//!
//! A PostgreSQL-backed catalog of books and user reviews, with JWT
//! authentication, role-based write access, rating aggregation, and
//! AI-generated summaries sourced from an Ollama-compatible gateway.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
