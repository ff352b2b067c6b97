//! Fan-site chat proxy
//!
//! A small HTTP service backing the chat widget of a static fan site.
//! It exposes two stateless proxy endpoints that forward chat traffic
//! to third-party language-model APIs — a single-turn Gemini
//! generation endpoint and a multi-turn Groq chat-completion endpoint
//! — normalizing request/response shapes and error statuses, with
//! permissive CORS so the front-end can call them cross-origin.

pub mod api;
pub mod core;
pub mod models;

pub use crate::api::endpoints::{AppState, create_router};
pub use crate::core::config::Config;
