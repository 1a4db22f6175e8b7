// ABOUTME: Integration tests for the fetch and compare commands against a mock HTTP server
// ABOUTME: Covers text and JSON rendering, saved images, and strategy agreement

use mockito::{Server, ServerGuard};
use paired_cli::app::{build_fetcher, run_compare, run_fetch, FetchOptions};
use paired_cli::config::{Format, Settings};
use paired_cli::output::{JsonFormatter, TextFormatter};
use paired_sdk::{HandshakeWait, ResourceEndpoints, ResourceId, Strategy};
use tempfile::TempDir;

const GOKU_JSON: &str = r#"{"name":"Goku","firstAppearance":"1984","year":1984}"#;

fn png_fixture() -> Vec<u8> {
    let buffer = image::RgbImage::from_pixel(4, 3, image::Rgb([20, 90, 200]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(buffer)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

async fn serve_goku(server: &mut ServerGuard) {
    server
        .mock("GET", "/part1/1.png")
        .with_status(200)
        .with_body(png_fixture())
        .create_async()
        .await;
    server
        .mock("GET", "/part1/1.json")
        .with_status(200)
        .with_body(GOKU_JSON)
        .create_async()
        .await;
}

fn settings_for(server: &ServerGuard) -> Settings {
    Settings {
        endpoints: ResourceEndpoints::new(&format!("{}/part1/", server.url())).unwrap(),
        strategy: Strategy::Sequential,
        timeout: None,
        handshake_wait: HandshakeWait::Unbounded,
        format: Format::Text,
    }
}

fn options(id: u64, strategy: Strategy) -> FetchOptions {
    FetchOptions {
        id: ResourceId(id),
        strategy,
        save: None,
        show_progress: false,
        use_color: false,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fetch_renders_text() {
    let mut server = Server::new_async().await;
    serve_goku(&mut server).await;
    let fetcher = build_fetcher(&settings_for(&server)).unwrap();

    let mut out = Vec::new();
    let ok = run_fetch(
        &fetcher,
        &options(1, Strategy::Parallel),
        &TextFormatter::new(false),
        &mut out,
    )
    .await
    .unwrap();

    assert!(ok);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "Goku (1984 - 1984)\nPNG image, 4x3 (id 1, parallel strategy)\n"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fetch_renders_json_for_every_strategy() {
    let mut server = Server::new_async().await;
    serve_goku(&mut server).await;
    let fetcher = build_fetcher(&settings_for(&server)).unwrap();

    for strategy in Strategy::ALL {
        let mut out = Vec::new();
        let ok = run_fetch(
            &fetcher,
            &options(1, strategy),
            &JsonFormatter::new(false),
            &mut out,
        )
        .await
        .unwrap();
        assert!(ok, "{strategy} failed");

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["strategy"], strategy.name());
        assert_eq!(parsed["metadata"]["name"], "Goku");
        assert_eq!(parsed["image"]["format"], "PNG");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fetch_missing_image_reports_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/part1/2.png")
        .with_status(404)
        .create_async()
        .await;
    let metadata = server
        .mock("GET", "/part1/2.json")
        .with_status(200)
        .with_body(GOKU_JSON)
        .expect(0)
        .create_async()
        .await;
    let fetcher = build_fetcher(&settings_for(&server)).unwrap();

    let mut out = Vec::new();
    let ok = run_fetch(
        &fetcher,
        &options(2, Strategy::Sequential),
        &TextFormatter::new(false),
        &mut out,
    )
    .await
    .unwrap();

    assert!(!ok);
    metadata.assert_async().await;
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("error: Image could not be fetched"));
    assert!(text.contains("help: No resource exists for this id"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fetch_saves_image() {
    let mut server = Server::new_async().await;
    serve_goku(&mut server).await;
    let fetcher = build_fetcher(&settings_for(&server)).unwrap();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("goku.png");
    let mut fetch = options(1, Strategy::NestedCallback);
    fetch.save = Some(path.clone());

    let mut out = Vec::new();
    let ok = run_fetch(&fetcher, &fetch, &TextFormatter::new(false), &mut out)
        .await
        .unwrap();

    assert!(ok);
    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (4, 3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_compare_reports_agreement() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/part1/3.png")
        .with_status(200)
        .with_body(png_fixture())
        .create_async()
        .await;
    server
        .mock("GET", "/part1/3.json")
        .with_status(200)
        .with_body(r#"{"name":"Vegeta"}"#)
        .create_async()
        .await;
    let fetcher = build_fetcher(&settings_for(&server)).unwrap();

    let mut out = Vec::new();
    let agree = run_compare(&fetcher, ResourceId(3), &JsonFormatter::new(false), &mut out)
        .await
        .unwrap();

    assert!(agree);
    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let rows = parsed["rows"].as_array().unwrap();
    assert_eq!(rows.len(), Strategy::ALL.len());
    assert!(rows
        .iter()
        .all(|row| row["outcome"].as_str().unwrap().starts_with("invalid-metadata")));
}
