//! The translation job: a single-writer pipeline from handler snapshots to
//! the status cache.

use async_stream::stream;
use dtk_cache::StatusCache;
use dtk_core::SnapshotStream;
use dtk_translator::{FileTranslator, TranslateContext, stream_translate};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Drive `handler` over `ctx`, writing every snapshot through to the status
/// cache before yielding it. A cache write failure is logged and the job
/// continues in memory; the terminal state becomes visible again once the
/// cache recovers. The uploaded input file is removed after the terminal
/// snapshot.
pub fn persisted_snapshots(
    handler: Arc<dyn FileTranslator>,
    ctx: TranslateContext,
    cache: Arc<dyn StatusCache>,
    user_id: String,
) -> SnapshotStream {
    Box::pin(stream! {
        let input_path = ctx.input_path.clone();
        let task_id = ctx.task.task_id.clone();

        let mut snapshots = stream_translate(handler, ctx);
        while let Some(snapshot) = snapshots.next().await {
            if let Err(e) = cache.set(&user_id, &snapshot).await {
                warn!(task_id = %task_id, error = %e, "failed to persist task snapshot");
            }
            yield snapshot;
        }

        if let Err(e) = tokio::fs::remove_file(&input_path).await {
            debug!(path = %input_path.display(), error = %e, "input file cleanup skipped");
        }
    })
}

/// Fire-and-forget mode: consume the snapshot stream on a background worker.
pub fn spawn_background(snapshots: SnapshotStream) {
    tokio::spawn(async move {
        let mut snapshots = snapshots;
        while snapshots.next().await.is_some() {}
    });
}
