//! End-to-end request flow tests

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::util::ServiceExt;

use super::fixtures::{ScriptedExtractor, TestDirs};
use crate::extractor::InfoDict;
use crate::http::create_router;
use crate::http::handlers::{MSG_NO_SELECTION, MSG_NO_VIDEOS, MSG_READY};
use crate::media::VideoDescriptor;

async fn post_form(app: Router, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn playlist(ids: &[&str]) -> InfoDict {
    InfoDict {
        id: Some("PLmix".to_string()),
        entries: Some(
            ids.iter()
                .map(|id| {
                    Some(InfoDict {
                        id: Some(id.to_string()),
                        title: Some(format!("Song {}", id)),
                        ..Default::default()
                    })
                })
                .collect(),
        ),
        ..Default::default()
    }
}

fn zip_entries(path: &std::path::Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_get_index() {
    let dirs = TestDirs::new();
    let app = create_router(dirs.state(ScriptedExtractor::new()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}

#[tokio::test]
async fn test_list_normalizes_playlist_url() {
    let dirs = TestDirs::new();
    let extractor = ScriptedExtractor::new().with_info(
        "https://www.youtube.com/playlist?list=PLmix",
        playlist(&["a1", "b2"]),
    );
    let app = create_router(dirs.state(extractor));

    let (status, html) = post_form(
        app,
        "playlist_url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Da1%26list%3DPLmix",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("value=\"https://www.youtube.com/watch?v=a1\""));
    assert!(html.contains("src=\"https://img.youtube.com/vi/b2/hqdefault.jpg\""));
    assert!(!html.contains(MSG_NO_VIDEOS));
}

#[tokio::test]
async fn test_list_failure_shows_message() {
    let dirs = TestDirs::new();
    let app = create_router(dirs.state(ScriptedExtractor::new().with_failure("https://bad")));

    let (status, html) = post_form(app, "playlist_url=https%3A%2F%2Fbad").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(MSG_NO_VIDEOS));
    assert!(!html.contains("download_urls[]"));
}

#[tokio::test]
async fn test_blank_url_shows_message() {
    let dirs = TestDirs::new();
    let app = create_router(dirs.state(ScriptedExtractor::new()));

    let (_, html) = post_form(app, "playlist_url=+++").await;
    assert!(html.contains(MSG_NO_VIDEOS));
}

#[tokio::test]
async fn test_empty_selection_creates_no_archive() {
    let dirs = TestDirs::new();
    let app = create_router(dirs.state(ScriptedExtractor::new()));

    let (status, html) = post_form(app, "download=1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(MSG_NO_SELECTION));
    assert!(dirs.published().is_empty());
    assert!(dirs.leftover_work().is_empty());
}

#[tokio::test]
async fn test_download_with_one_failure() {
    let dirs = TestDirs::new();
    let extractor = ScriptedExtractor::new()
        .with_track("https://v/1", "One")
        .with_failure("https://v/2")
        .with_track("https://v/3", "Three");
    let app = create_router(dirs.state(extractor));

    let body = ["1", "2", "3"]
        .iter()
        .map(|n| format!("download_urls%5B%5D=https%3A%2F%2Fv%2F{}", n))
        .collect::<Vec<_>>()
        .join("&");
    let (status, html) = post_form(app, &body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(MSG_READY));

    let published = dirs.published();
    assert_eq!(published.len(), 1);
    let name = &published[0];
    assert!(name.starts_with("bundle-") && name.ends_with(".zip"));
    assert!(html.contains(&format!("href=\"/downloads/{}\"", name)));

    assert_eq!(
        zip_entries(&dirs.download_dir().join(name)),
        vec!["One.mp3", "Three.mp3"]
    );
    // Workspace and the intermediate archive are gone.
    assert!(dirs.leftover_work().is_empty());
}

#[tokio::test]
async fn test_all_failures_still_publish_empty_archive() {
    let dirs = TestDirs::new();
    let app = create_router(dirs.state(ScriptedExtractor::new().with_failure("x")));

    let (_, html) = post_form(app, "download_urls[]=x").await;

    assert!(html.contains(MSG_READY));
    let published = dirs.published();
    assert_eq!(published.len(), 1);
    assert!(zip_entries(&dirs.download_dir().join(&published[0])).is_empty());
}

#[tokio::test]
async fn test_publish_failure_returns_500_and_cleans_up() {
    let dirs = TestDirs::new();
    let mut config = dirs.config();
    // A regular file where the download directory should be
    let blocker = dirs.root.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();
    config.downloads.download_dir = blocker;
    let extractor = ScriptedExtractor::new().with_track("u1", "One");
    let state = std::sync::Arc::new(crate::state::AppState::with_extractor(
        config,
        std::sync::Arc::new(extractor),
    ));
    let app = create_router(state);

    let (status, body) = post_form(app, "download_urls[]=u1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("IO error:"), "unexpected body: {}", body);
    assert!(dirs.leftover_work().is_empty());

    let stray: Vec<_> = walkdir::WalkDir::new(dirs.root.path())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.starts_with("bundle-") && name.ends_with(".zip")
        })
        .collect();
    assert!(stray.is_empty(), "archives left behind: {:?}", stray);
}

#[tokio::test]
async fn test_download_endpoint_serves_attachment() {
    let dirs = TestDirs::new();
    let state = dirs.state(ScriptedExtractor::new());
    std::fs::write(dirs.download_dir().join("bundle-abc.zip"), b"PK\x03\x04data").unwrap();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/downloads/bundle-abc.zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"bundle-abc.zip\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"PK\x03\x04data");
}

#[tokio::test]
async fn test_download_endpoint_missing_file() {
    let dirs = TestDirs::new();
    let app = create_router(dirs.state(ScriptedExtractor::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/downloads/bundle-missing.zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_endpoint_strict_names() {
    let dirs = TestDirs::new();
    let state = dirs.state(ScriptedExtractor::new());
    std::fs::write(dirs.root.path().join("secret.zip"), b"secret").unwrap();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/downloads/..%2Fsecret.zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_endpoint_lenient_names() {
    let dirs = TestDirs::new();
    let mut config = dirs.config();
    config.downloads.strict_filenames = false;
    let state = std::sync::Arc::new(crate::state::AppState::with_extractor(
        config,
        std::sync::Arc::new(ScriptedExtractor::new()),
    ));
    state.ensure_download_dir().unwrap();
    std::fs::write(dirs.root.path().join("secret.zip"), b"secret").unwrap();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/downloads/..%2Fsecret.zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"secret");
}

#[tokio::test]
async fn test_api_videos() {
    let dirs = TestDirs::new();
    let extractor = ScriptedExtractor::new().with_info(
        "https://www.youtube.com/playlist?list=PLmix",
        playlist(&["a1"]),
    );
    let app = create_router(dirs.state(extractor));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/videos?url=https%3A%2F%2Fyoutube.com%2Fwatch%3Fv%3Da1%26list%3DPLmix")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let videos: Vec<VideoDescriptor> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=a1");
    assert_eq!(videos[0].title, "Song a1");
}

#[tokio::test]
async fn test_api_videos_requires_url() {
    let dirs = TestDirs::new();
    let app = create_router(dirs.state(ScriptedExtractor::new()));

    let response = app
        .oneshot(Request::builder().uri("/api/videos").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_never_downloads() {
    let dirs = TestDirs::new();
    let extractor = ScriptedExtractor::new().with_track("https://v/1", "One");
    let app = create_router(dirs.state(extractor));

    let (_, html) = post_form(app, "playlist_url=https%3A%2F%2Fv%2F1").await;

    assert!(html.contains("One"));
    assert!(dirs.published().is_empty());
    assert!(dirs.leftover_work().is_empty());
}

#[tokio::test]
async fn test_served_over_socket() {
    let dirs = TestDirs::new();
    let state = dirs.state(ScriptedExtractor::new());
    std::fs::write(dirs.download_dir().join("bundle-net.zip"), b"zipbytes").unwrap();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/downloads/bundle-net.zip", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"bundle-net.zip\""
    );
    assert_eq!(&response.bytes().await.unwrap()[..], b"zipbytes");

    let response = client
        .post(format!("http://{}/", addr))
        .form(&[("download", "1")])
        .send()
        .await
        .unwrap();
    assert!(response.text().await.unwrap().contains(MSG_NO_SELECTION));
}
