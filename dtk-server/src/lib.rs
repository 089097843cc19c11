//! # dtk-server
//!
//! HTTP job API for DTK translation services.
//!
//! ## Overview
//!
//! - [`create_app`] - Build the REST API router
//! - [`ServerConfig`] - Service wiring (model, registry, cache, history)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dtk_cache::InMemoryStatusCache;
//! use dtk_history::InMemoryHistoryStore;
//! use dtk_model::OpenAiModel;
//! use dtk_server::{ServerConfig, create_app};
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServerConfig::new(
//!     Arc::new(OpenAiModel::from_env()?),
//!     Arc::new(InMemoryStatusCache::new()),
//!     Arc::new(InMemoryHistoryStore::new()),
//! );
//! let app = create_app(config);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/translation/text` | Translate a text snippet |
//! | POST | `/translation/file/{task_name}` | Submit a file (multipart; SSE when `is_stream`) |
//! | GET | `/translation/status?task_id=` | One task snapshot |
//! | GET | `/translation/status/all` | All of the user's task snapshots |
//! | GET | `/translation/download?task_id=` | Download the translated file |
//! | POST | `/translation/file/history/create?task_id=` | Promote a terminal task to history |
//! | GET | `/translation/file/history` | History listing, newest first |
//!
//! The authenticated identity arrives in the `x-user-id` header, installed
//! by the upstream auth layer.

pub mod config;
pub mod job;
pub mod rest;

pub use config::ServerConfig;
pub use rest::create_app;
