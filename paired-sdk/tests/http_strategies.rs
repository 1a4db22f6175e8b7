// ABOUTME: End-to-end tests running every fetch strategy against a mock HTTP server
// ABOUTME: Verifies success, bad image, and invalid metadata scenarios over real HTTP

use mockito::{Server, ServerGuard};
use paired_sdk::{
    FetchErrorKind, HttpTransport, ImageMetadata, LegFailure, PairedFetcher, ResourceEndpoints,
    ResourceId, Strategy,
};

const GOKU_JSON: &str = r#"{"name":"Goku","firstAppearance":"1984","year":1984}"#;

fn png_fixture() -> Vec<u8> {
    let buffer = image::RgbImage::from_pixel(8, 6, image::Rgb([255, 140, 0]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(buffer)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn fetcher_for(server: &ServerGuard) -> PairedFetcher<HttpTransport> {
    let endpoints = ResourceEndpoints::new(&format!("{}/part1/", server.url())).unwrap();
    PairedFetcher::new(HttpTransport::new().unwrap(), endpoints).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_all_strategies_fetch_goku() {
    for strategy in Strategy::ALL {
        let mut server = Server::new_async().await;
        let image = server
            .mock("GET", "/part1/1.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(png_fixture())
            .expect(1)
            .create_async()
            .await;
        let metadata = server
            .mock("GET", "/part1/1.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(GOKU_JSON)
            .expect(1)
            .create_async()
            .await;

        let resource = fetcher_for(&server)
            .fetch(ResourceId(1), strategy)
            .await
            .unwrap_or_else(|e| panic!("{} failed: {}", strategy, e));

        image.assert_async().await;
        metadata.assert_async().await;
        assert_eq!(
            resource.metadata(),
            &ImageMetadata {
                name: "Goku".to_string(),
                first_appearance: "1984".to_string(),
                year: 1984,
            }
        );
        assert_eq!(resource.image().width(), 8);
        assert_eq!(resource.image().height(), 6);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_image_never_requests_metadata() {
    for strategy in Strategy::ALL.into_iter().filter(Strategy::orders_legs) {
        let mut server = Server::new_async().await;
        let image = server
            .mock("GET", "/part1/2.png")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let metadata = server
            .mock("GET", "/part1/2.json")
            .with_status(200)
            .with_body(GOKU_JSON)
            .expect(0)
            .create_async()
            .await;

        let err = fetcher_for(&server)
            .fetch(ResourceId(2), strategy)
            .await
            .unwrap_err();

        image.assert_async().await;
        metadata.assert_async().await;
        assert_eq!(err.kind(), FetchErrorKind::BadImage, "{}", strategy);
        assert_eq!(err.cause(), &LegFailure::Status(404));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_image_with_parallel_strategy() {
    let mut server = Server::new_async().await;
    let _image = server
        .mock("GET", "/part1/2.png")
        .with_status(404)
        .create_async()
        .await;
    let _metadata = server
        .mock("GET", "/part1/2.json")
        .with_status(200)
        .with_body(GOKU_JSON)
        .create_async()
        .await;

    let err = fetcher_for(&server)
        .fetch(ResourceId(2), Strategy::Parallel)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::BadImage);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_incomplete_metadata_fails_every_strategy() {
    for strategy in Strategy::ALL {
        let mut server = Server::new_async().await;
        let _image = server
            .mock("GET", "/part1/3.png")
            .with_status(200)
            .with_body(png_fixture())
            .create_async()
            .await;
        let _metadata = server
            .mock("GET", "/part1/3.json")
            .with_status(200)
            .with_body(r#"{"name":"X"}"#)
            .create_async()
            .await;

        let err = fetcher_for(&server)
            .fetch(ResourceId(3), strategy)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FetchErrorKind::InvalidMetadata, "{}", strategy);
    }
}
