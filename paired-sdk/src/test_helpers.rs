// ABOUTME: Test helper transports and fixtures for exercising fetch strategies
// ABOUTME: Provides a canned-response fake transport, callback fakes, and PNG fixtures

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use parking_lot::Mutex;
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::time::Duration;
#[cfg(test)]
use url::Url;

#[cfg(test)]
use crate::completion::Completion;
#[cfg(test)]
use crate::error::TransportError;
#[cfg(test)]
use crate::model::{Response, TransportResult};
#[cfg(test)]
use crate::transport::{CallbackTransport, Transport};

#[cfg(test)]
pub const GOKU_JSON: &str = r#"{"name":"Goku","firstAppearance":"1984","year":1984}"#;

#[cfg(test)]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let buffer = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 40) as u8, (y * 40) as u8, 128, 255])
    });
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(buffer)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

#[cfg(test)]
#[derive(Clone)]
enum Route {
    Respond(Response),
    Fail(TransportError),
}

/// In-memory transport with per-URL canned answers, optional delays, and
/// call counting. Unknown URLs answer 404.
#[cfg(test)]
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, (Route, Duration)>,
    calls: Mutex<Vec<String>>,
}

#[cfg(test)]
impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: Vec<u8>) -> Self {
        self.routes.insert(
            url.to_string(),
            (Route::Respond(Response::new(status, body)), Duration::ZERO),
        );
        self
    }

    pub fn fail(mut self, url: &str, error: TransportError) -> Self {
        self.routes
            .insert(url.to_string(), (Route::Fail(error), Duration::ZERO));
        self
    }

    /// Delay the answer for an already registered URL.
    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        if let Some(route) = self.routes.get_mut(url) {
            route.1 = delay;
        }
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|u| u.as_str() == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, url: &Url) -> Result<Response, TransportError> {
        self.calls.lock().push(url.to_string());

        let (route, delay) = self
            .routes
            .get(url.as_str())
            .cloned()
            .unwrap_or((Route::Respond(Response::new(404, Vec::new())), Duration::ZERO));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match route {
            Route::Respond(response) => Ok(response),
            Route::Fail(error) => Err(error),
        }
    }
}

/// Callback transport that answers from a plain thread after a delay.
#[cfg(test)]
pub struct DelayedCallbacks {
    delay: Duration,
    result: TransportResult,
}

#[cfg(test)]
impl DelayedCallbacks {
    pub fn new(delay: Duration, result: TransportResult) -> Self {
        Self { delay, result }
    }
}

#[cfg(test)]
impl CallbackTransport for DelayedCallbacks {
    fn fetch_with(&self, _url: &Url, on_complete: Completion<TransportResult>) {
        let delay = self.delay;
        let result = self.result.clone();
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            on_complete.complete(result);
        });
    }
}

/// Callback transport that never calls back; it keeps the completions alive.
#[cfg(test)]
#[derive(Default)]
pub struct SilentCallbacks {
    parked: Mutex<Vec<Completion<TransportResult>>>,
}

#[cfg(test)]
impl SilentCallbacks {
    pub fn parked(&self) -> usize {
        self.parked.lock().len()
    }
}

#[cfg(test)]
impl CallbackTransport for SilentCallbacks {
    fn fetch_with(&self, _url: &Url, on_complete: Completion<TransportResult>) {
        self.parked.lock().push(on_complete);
    }
}

/// Answers image URLs with a PNG and metadata URLs with `GOKU_JSON`, except
/// that completions for URLs ending in `drop_suffix` are dropped unfired.
#[cfg(test)]
pub struct DroppingCallbacks {
    drop_suffix: &'static str,
}

#[cfg(test)]
impl DroppingCallbacks {
    pub fn new(drop_suffix: &'static str) -> Self {
        Self { drop_suffix }
    }
}

#[cfg(test)]
impl CallbackTransport for DroppingCallbacks {
    fn fetch_with(&self, url: &Url, on_complete: Completion<TransportResult>) {
        if url.as_str().ends_with(self.drop_suffix) {
            drop(on_complete);
            return;
        }
        let body = if url.as_str().ends_with(".png") {
            png_bytes(2, 2)
        } else {
            GOKU_JSON.as_bytes().to_vec()
        };
        let result = TransportResult::from(Ok::<_, TransportError>(Response::new(200, body)));
        std::thread::spawn(move || on_complete.complete(result));
    }
}
