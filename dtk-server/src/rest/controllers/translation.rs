use crate::ServerConfig;
use crate::job;
use crate::rest::error::ApiError;
use crate::rest::principal::UserPrincipal;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use dtk_core::{Language, TranslationTask};
use dtk_history::{HistoryRecord, InsertRequest, UpdateStatusRequest};
use dtk_translator::{TextTranslator, TranslateContext, TranslateOptions};
use futures::StreamExt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::info;

#[derive(Clone)]
pub struct TranslationController {
    config: ServerConfig,
}

impl TranslationController {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

#[derive(Deserialize)]
pub struct TextTranslationRequest {
    pub text: String,
    pub source_language: Language,
    pub target_language: Language,
    #[serde(default)]
    pub keywords_map: Option<IndexMap<String, String>>,
}

#[derive(Serialize)]
pub struct TextTranslationResponse {
    pub translated_text: String,
    pub duration: Option<f64>,
}

/// `params` multipart field of a file submission.
#[derive(Deserialize)]
struct SubmitParams {
    source_language: Language,
    target_language: Language,
    #[serde(default)]
    keywords_map: Option<IndexMap<String, String>>,
    #[serde(default)]
    kwargs: Option<serde_json::Value>,
    #[serde(default)]
    is_stream: bool,
}

#[derive(Deserialize)]
pub struct TaskQuery {
    pub task_id: String,
}

pub async fn translate_text(
    State(controller): State<TranslationController>,
    UserPrincipal(user_id): UserPrincipal,
    Json(req): Json<TextTranslationRequest>,
) -> Result<Json<TextTranslationResponse>, ApiError> {
    info!(user_id = %user_id, "translate text endpoint called");
    let started = Instant::now();

    let translator = TextTranslator::new(
        req.source_language,
        req.target_language,
        req.keywords_map,
        controller.config.llm.clone(),
    );
    let translated_text = translator.translate(&req.text).await?;

    Ok(Json(TextTranslationResponse {
        translated_text,
        duration: Some(started.elapsed().as_secs_f64()),
    }))
}

pub async fn submit_file(
    State(controller): State<TranslationController>,
    UserPrincipal(user_id): UserPrincipal,
    Path(task_name): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    info!(user_id = %user_id, task_name = %task_name, "translate file endpoint called");

    let mut params: Option<SubmitParams> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::unprocessable(format!("invalid multipart body: {}", e)))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("params") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::unprocessable(format!("invalid params field: {}", e)))?;
                params = Some(
                    serde_json::from_slice(&data)
                        .map_err(|e| ApiError::unprocessable(format!("invalid params: {}", e)))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::unprocessable(format!("invalid file field: {}", e)))?;
                upload = Some((file_name, data.to_vec()));
            }
            _ => {}
        }
    }

    let params = params.ok_or_else(|| ApiError::unprocessable("missing params field"))?;
    let (original_name, data) = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    let file_name = sanitize_file_name(&original_name);
    if file_name.is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }

    let extension = std::path::Path::new(&file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let handler = controller.config.registry.handler_for(extension)?;

    let options: TranslateOptions = match params.kwargs {
        Some(kwargs) => serde_json::from_value(kwargs)
            .map_err(|e| ApiError::unprocessable(format!("invalid kwargs: {}", e)))?,
        None => TranslateOptions::default(),
    };

    let input_dir = controller.config.upload_dir();
    tokio::fs::create_dir_all(&input_dir)
        .await
        .map_err(|e| ApiError::internal(format!("cannot create upload dir: {}", e)))?;
    let input_path = input_dir.join(&file_name);
    tokio::fs::write(&input_path, &data)
        .await
        .map_err(|e| ApiError::internal(format!("cannot store upload: {}", e)))?;
    info!(path = %input_path.display(), "uploaded file saved");

    let task_id = format!("{}_{}", Utc::now().timestamp(), file_name);
    let task = TranslationTask::new(&task_id, &task_name, input_path.display().to_string());
    controller.config.status_cache.set(&user_id, &task).await?;

    let translator = Arc::new(TextTranslator::new(
        params.source_language,
        params.target_language,
        params.keywords_map,
        controller.config.llm.clone(),
    ));
    let ctx = TranslateContext {
        task,
        input_path,
        output_dir: controller.config.translated_dir(),
        translator,
        options,
    };
    let snapshots =
        job::persisted_snapshots(handler, ctx, controller.config.status_cache.clone(), user_id);

    if params.is_stream {
        // the job runs detached so a client disconnect never cancels it; the
        // SSE stream is just an observer on the snapshot channel
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut snapshots = snapshots;
            while let Some(snapshot) = snapshots.next().await {
                let _ = sender.send(snapshot);
            }
        });
        let events = UnboundedReceiverStream::new(receiver)
            .filter_map(|snapshot| async move { serde_json::to_string(&snapshot).ok() })
            .map(|payload| Ok::<_, Infallible>(Event::default().data(payload)));
        Ok(Sse::new(events).keep_alive(KeepAlive::default()).into_response())
    } else {
        job::spawn_background(snapshots);
        Ok(Json(json!({ "task_id": task_id })).into_response())
    }
}

pub async fn get_status(
    State(controller): State<TranslationController>,
    UserPrincipal(user_id): UserPrincipal,
    Query(query): Query<TaskQuery>,
) -> Result<Json<TranslationTask>, ApiError> {
    let task = controller
        .config
        .status_cache
        .get(&user_id, &query.task_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(task))
}

pub async fn get_all_status(
    State(controller): State<TranslationController>,
    UserPrincipal(user_id): UserPrincipal,
) -> Result<Json<HashMap<String, TranslationTask>>, ApiError> {
    let tasks = controller.config.status_cache.get_all(&user_id).await?;
    Ok(Json(tasks))
}

pub async fn download(
    State(controller): State<TranslationController>,
    UserPrincipal(user_id): UserPrincipal,
    Query(query): Query<TaskQuery>,
) -> Result<Response, ApiError> {
    info!(user_id = %user_id, task_id = %query.task_id, "download endpoint called");

    // the durable row is authoritative once the task has been promoted; fall
    // back to the live cache entry for tasks not yet in history
    let mut resolved: Option<(String, String)> = None;
    if let Some(record) = controller.config.history_store.get_by_task_id(&query.task_id).await? {
        if let Some(path) = record.translated_file_path {
            let name = record
                .translated_file_name
                .unwrap_or_else(|| base_name(&path).to_string());
            resolved = Some((path, name));
        }
    }
    if resolved.is_none() {
        if let Some(task) = controller.config.status_cache.get(&user_id, &query.task_id).await? {
            if let Some(path) = task.output_file_path {
                let name = base_name(&path).to_string();
                resolved = Some((path, name));
            }
        }
    }

    let (path, file_name) = resolved.ok_or_else(|| ApiError::not_found("Task not found"))?;
    let data =
        tokio::fs::read(&path).await.map_err(|_| ApiError::not_found("File not found"))?;

    let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
    let mime_header = header::HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| header::HeaderValue::from_static("application/octet-stream"));

    Response::builder()
        .header(header::CONTENT_TYPE, mime_header)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(data))
        .map_err(|e| ApiError::internal(e.to_string()))
}

pub async fn create_history(
    State(controller): State<TranslationController>,
    UserPrincipal(user_id): UserPrincipal,
    Query(query): Query<TaskQuery>,
) -> Result<Json<HistoryRecord>, ApiError> {
    info!(user_id = %user_id, task_id = %query.task_id, "create history endpoint called");

    let task = controller
        .config
        .status_cache
        .get(&user_id, &query.task_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    if !task.is_terminal() {
        return Err(ApiError::unprocessable("Task not terminal"));
    }

    let translated_file_name =
        task.output_file_path.as_deref().map(|path| base_name(path).to_string());
    let history = &controller.config.history_store;

    let record = match history.get_by_task_id(&query.task_id).await? {
        Some(_) => history
            .update_status(
                &query.task_id,
                UpdateStatusRequest {
                    status: Some(task.status),
                    translated_file_name,
                    translated_file_path: task.output_file_path.clone(),
                    duration: task.duration,
                    error: task.error.clone(),
                },
            )
            .await?
            .ok_or_else(|| ApiError::internal("history row vanished during update"))?,
        None => {
            history
                .insert(InsertRequest {
                    user_id: user_id.clone(),
                    task_id: task.task_id.clone(),
                    task_name: task.task_name.clone(),
                    source_file_name: base_name(&task.input_file_path).to_string(),
                    source_file_path: task.input_file_path.clone(),
                    translated_file_name,
                    translated_file_path: task.output_file_path.clone(),
                    status: task.status,
                    duration: task.duration.unwrap_or(0.0),
                    error: task.error.clone(),
                })
                .await?
        }
    };

    // the cache entry has been promoted; external retention no longer applies
    controller.config.status_cache.delete(&user_id, &query.task_id).await?;

    Ok(Json(record))
}

pub async fn list_history(
    State(controller): State<TranslationController>,
    UserPrincipal(user_id): UserPrincipal,
) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    let records = controller.config.history_store.get_by_user_id(&user_id).await?;
    Ok(Json(records))
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Keep only the final path component and drop control characters; uploads
/// must not escape the upload directory.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    base.chars().filter(|c| !c.is_control()).collect::<String>().trim().trim_matches('.').to_string()
}
