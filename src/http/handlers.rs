//! HTTP request handlers

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use url::form_urlencoded;

use super::page::{render_index, PageView};
use crate::error::AppError;
use crate::media::{
    fetch_audio, list_videos, normalize_url, publish_archive, zip_folder, VideoDescriptor,
};
use crate::state::AppState;

pub const MSG_NO_VIDEOS: &str = "No videos found or URL unavailable.";
pub const MSG_NO_SELECTION: &str = "No videos selected for download.";
pub const MSG_READY: &str = "File ready! Click the button below to download.";

/// HTTP error type
#[derive(Debug)]
pub enum HttpError {
    NotFound(String),
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            HttpError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            HttpError::InternalError(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };

        (status, message).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        tracing::error!("Request failed: {}", err);
        HttpError::InternalError(err.to_string())
    }
}

/// What a POST to `/` asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexForm {
    /// List the videos behind a URL
    List(String),
    /// Download the selected URLs; may be empty
    Download(Vec<String>),
    /// Neither field was submitted
    Empty,
}

impl IndexForm {
    /// Parse an urlencoded body. `playlist_url` takes precedence; the
    /// download branch is chosen by any `download_urls[]` value or the
    /// download form's submit field. Blank selections are dropped.
    pub fn parse(body: &[u8]) -> Self {
        let mut playlist_url = None;
        let mut download_requested = false;
        let mut urls = Vec::new();

        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                "playlist_url" if playlist_url.is_none() => playlist_url = Some(value.into_owned()),
                "download_urls[]" => {
                    download_requested = true;
                    let value = value.trim();
                    if !value.is_empty() {
                        urls.push(value.to_string());
                    }
                }
                "download" => download_requested = true,
                _ => {}
            }
        }

        match playlist_url {
            Some(url) => IndexForm::List(url.trim().to_string()),
            None if download_requested => IndexForm::Download(urls),
            None => IndexForm::Empty,
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Version information endpoint
pub async fn version_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "engine": state.extractor.name(),
    }))
}

/// GET /
pub async fn index_page() -> Html<String> {
    Html(render_index(&PageView::default()))
}

/// POST /
pub async fn index_submit(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, HttpError> {
    let view = match IndexForm::parse(&body) {
        IndexForm::List(url) => list_page(&state, url).await,
        IndexForm::Download(urls) if urls.is_empty() => PageView::message(MSG_NO_SELECTION),
        IndexForm::Download(urls) => {
            let name = run_download_job(&state, urls).await?;
            PageView {
                message: MSG_READY.to_string(),
                download_link: Some(name),
                ..Default::default()
            }
        }
        IndexForm::Empty => PageView::default(),
    };

    Ok(Html(render_index(&view)))
}

async fn list_page(state: &AppState, url: String) -> PageView {
    let videos = if url.is_empty() {
        Vec::new()
    } else {
        list_normalized(state, &url).await
    };

    let message = if videos.is_empty() {
        MSG_NO_VIDEOS.to_string()
    } else {
        String::new()
    };

    PageView {
        playlist_url: url,
        videos,
        message,
        download_link: None,
    }
}

async fn list_normalized(state: &AppState, url: &str) -> Vec<VideoDescriptor> {
    let url = normalize_url(url);
    list_videos(state.extractor.as_ref(), &url).await
}

/// Fetch, archive and publish one selection. Returns the archive's public name.
async fn run_download_job(state: &AppState, urls: Vec<String>) -> Result<String, HttpError> {
    let downloads = state.config.downloads.clone();
    let workspace = fetch_audio(
        state.extractor.as_ref(),
        &urls,
        &downloads.work_dir,
        &state.config.extractor,
    )
    .await?;

    // Zipping and publishing touch the filesystem only
    let name = tokio::task::spawn_blocking(move || -> crate::error::Result<String> {
        let archive = zip_folder(workspace.path())?;
        if let Err(e) = workspace.remove() {
            tracing::warn!("Failed to remove workspace: {}", e);
        }

        publish_archive(&archive, &downloads.download_dir).inspect_err(|_| {
            let _ = std::fs::remove_file(&archive);
        })
    })
    .await
    .map_err(|e| HttpError::InternalError(e.to_string()))??;

    Ok(name)
}

#[derive(Debug, Deserialize)]
pub struct VideosQuery {
    pub url: Option<String>,
}

/// GET /api/videos?url=...
pub async fn api_videos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VideosQuery>,
) -> Result<Json<Vec<VideoDescriptor>>, HttpError> {
    let url = query
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| HttpError::BadRequest("missing url parameter".to_string()))?;

    Ok(Json(list_normalized(&state, &url).await))
}

fn plain_file_name(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9._-]*$").expect("valid regex"))
        .is_match(name)
}

/// GET /downloads/{filename}
///
/// Streams an archive from the download directory as an attachment.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, HttpError> {
    let downloads = &state.config.downloads;
    let not_found = || HttpError::NotFound(format!("File not found: {}", filename));

    if downloads.strict_filenames && !plain_file_name(&filename) {
        tracing::warn!("Rejected download name {:?}", filename);
        return Err(not_found());
    }

    let path = downloads.download_dir.join(&filename);
    let is_file = tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(not_found());
    }

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    let mut response = response.map(Body::new);

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);

    Ok(response)
}
