//! # dtk-model
//!
//! OpenAI-compatible chat model client for DTK services.
//!
//! [`OpenAiModel`] implements [`dtk_core::Llm`] against any endpoint that
//! speaks the `/chat/completions` protocol (DashScope/Qwen, OpenAI, Ollama,
//! vLLM, ...).
//!
//! ```rust,no_run
//! use dtk_model::OpenAiModel;
//!
//! let model = OpenAiModel::new("sk-...")
//!     .with_base_url("http://localhost:11434/v1")
//!     .with_model("qwen2.5:7b");
//! ```

pub mod client;

pub use client::OpenAiModel;
