//! # dtk-core
//!
//! Core types for DTK translation services.
//!
//! ## Overview
//!
//! This crate provides the foundational abstractions shared by the
//! translation pipeline and its storage and HTTP layers:
//!
//! - [`Language`] - Source/target languages and their default fonts
//! - [`TranslationTask`] / [`TaskStatus`] - One submission's mutable state
//! - [`TaskStream`] / [`SnapshotStream`] - Progress streams yielded by handlers
//! - [`Llm`] - The opaque chat capability translations run on
//! - [`DtkError`] / [`Result`] - Unified error handling
//!
//! ## Task lifecycle
//!
//! A task starts in `PROCESSING` at progress `0.0`, is mutated only by its
//! executing job, and ends in `COMPLETED` (output path set, progress `1.0`)
//! or `ERROR` (error message set). Each transition is persisted to the
//! status cache before it becomes observable.

pub mod error;
pub mod language;
pub mod llm;
pub mod task;

pub use error::{DtkError, Result};
pub use language::Language;
pub use llm::{CompletionRequest, Llm};
pub use task::{SnapshotStream, TaskStatus, TaskStream, TranslationTask};
