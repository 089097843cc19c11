use crate::TextTranslator;
use async_stream::stream;
use dtk_core::{SnapshotStream, TaskStatus, TaskStream, TranslationTask};
use futures::StreamExt;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Handler options carried in the submission's `kwargs` object. Unknown keys
/// are ignored so clients can pass options for other formats.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    pub run_parallely: bool,
    pub target_pages: Option<Vec<usize>>,
    pub translate_pictures: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self { run_parallely: true, target_pages: None, translate_pictures: false }
    }
}

/// Everything one translation job needs: the task record it mutates, the
/// document paths, the per-job text translator, and the handler options.
pub struct TranslateContext {
    pub task: TranslationTask,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub translator: Arc<TextTranslator>,
    pub options: TranslateOptions,
}

/// A format-specific translator. Implementations walk the document, call the
/// text translator per text unit, and yield a task snapshot after each unit
/// of progress.
///
/// Per-slide (or per-section) failures are recorded on the snapshot's
/// `error` field without ending the stream; a yielded `Err` means the
/// document is unusable and ends the job in ERROR.
pub trait FileTranslator: Send + Sync {
    fn translate_impl(&self, ctx: TranslateContext) -> TaskStream;
}

/// Drive a handler to a terminal snapshot.
///
/// Wraps [`FileTranslator::translate_impl`] with the lifecycle the API layer
/// relies on: starts the stopwatch, forwards progress snapshots, converts a
/// fatal error into a terminal ERROR snapshot, otherwise finishes with
/// COMPLETED pinned to progress 1.0, and stamps the duration on the final
/// snapshot.
pub fn stream_translate(handler: Arc<dyn FileTranslator>, ctx: TranslateContext) -> SnapshotStream {
    Box::pin(stream! {
        let input_path = ctx.input_path.display().to_string();
        info!(input = %input_path, "starting translation");
        let started = Instant::now();

        let mut task = ctx.task.clone();
        task.status = TaskStatus::Processing;
        task.progress = 0.0;

        let mut inner = handler.translate_impl(ctx);
        let mut failed = false;
        while let Some(item) = inner.next().await {
            match item {
                Ok(snapshot) => {
                    task = snapshot.clone();
                    yield snapshot;
                }
                Err(e) => {
                    error!(input = %input_path, error = %e, "translation failed");
                    task.status = TaskStatus::Error;
                    task.error = Some(e.to_string());
                    failed = true;
                    break;
                }
            }
        }

        if !failed && task.status != TaskStatus::Error {
            task.status = TaskStatus::Completed;
            task.progress = 1.0;
        }
        task.duration = Some(started.elapsed().as_secs_f64());
        info!(
            input = %input_path,
            status = %task.status,
            duration = task.duration.unwrap_or_default(),
            "translation finished"
        );
        yield task;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtk_core::{DtkError, Language, Llm, Result};
    use futures::StreamExt;

    struct NoopLlm;

    #[async_trait::async_trait]
    impl Llm for NoopLlm {
        fn name(&self) -> &str {
            "noop"
        }

        async fn complete(&self, _req: dtk_core::CompletionRequest) -> Result<String> {
            Ok(String::new())
        }
    }

    fn ctx() -> TranslateContext {
        TranslateContext {
            task: TranslationTask::new("1_deck.pptx", "英➡︎日", "/tmp/deck.pptx"),
            input_path: PathBuf::from("/tmp/deck.pptx"),
            output_dir: PathBuf::from("/tmp/out"),
            translator: Arc::new(TextTranslator::new(
                Language::English,
                Language::Japanese,
                None,
                Arc::new(NoopLlm),
            )),
            options: TranslateOptions::default(),
        }
    }

    struct TwoStepHandler;

    impl FileTranslator for TwoStepHandler {
        fn translate_impl(&self, ctx: TranslateContext) -> TaskStream {
            Box::pin(async_stream::stream! {
                let mut task = ctx.task;
                task.progress = 0.5;
                yield Ok(task.clone());
                task.progress = 1.0;
                task.output_file_path = Some("/tmp/out/done.pptx".to_string());
                yield Ok(task.clone());
            })
        }
    }

    struct FailingHandler;

    impl FileTranslator for FailingHandler {
        fn translate_impl(&self, ctx: TranslateContext) -> TaskStream {
            Box::pin(async_stream::stream! {
                let task = ctx.task;
                yield Ok(task.clone());
                yield Err(DtkError::Document("not a pptx".to_string()));
            })
        }
    }

    #[tokio::test]
    async fn test_completed_snapshot_is_terminal_and_timed() {
        let snapshots: Vec<_> =
            stream_translate(Arc::new(TwoStepHandler), ctx()).collect().await;

        assert_eq!(snapshots.len(), 3);
        let last = snapshots.last().unwrap();
        assert_eq!(last.status, TaskStatus::Completed);
        assert_eq!(last.progress, 1.0);
        assert!(last.duration.is_some());
        assert_eq!(last.output_file_path.as_deref(), Some("/tmp/out/done.pptx"));
    }

    #[tokio::test]
    async fn test_progress_is_monotone() {
        let snapshots: Vec<_> =
            stream_translate(Arc::new(TwoStepHandler), ctx()).collect().await;
        for pair in snapshots.windows(2) {
            assert!(pair[1].progress >= pair[0].progress);
        }
    }

    #[tokio::test]
    async fn test_fatal_error_yields_error_snapshot() {
        let snapshots: Vec<_> =
            stream_translate(Arc::new(FailingHandler), ctx()).collect().await;

        let last = snapshots.last().unwrap();
        assert_eq!(last.status, TaskStatus::Error);
        assert_eq!(last.error.as_deref(), Some("Document error: not a pptx"));
        assert!(last.duration.is_some());
    }

    #[test]
    fn test_options_parse_from_kwargs() {
        let kwargs = serde_json::json!({
            "run_parallely": false,
            "target_pages": [0, 2],
            "translate_pictures": true,
            "some_future_option": "ignored"
        });
        let options: TranslateOptions = serde_json::from_value(kwargs).unwrap();
        assert!(!options.run_parallely);
        assert_eq!(options.target_pages, Some(vec![0, 2]));
        assert!(options.translate_pictures);
    }

    #[test]
    fn test_options_defaults() {
        let options = TranslateOptions::default();
        assert!(options.run_parallely);
        assert!(options.target_pages.is_none());
        assert!(!options.translate_pictures);
    }
}
