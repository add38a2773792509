//! Integration tests for the Martabak storefront.
//!
//! Requests are driven through the full router with `tower::ServiceExt`,
//! so no server or network is needed:
//!
//! ```bash
//! cargo test -p martabak-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - cookie cart mutations, badge and checkout hand-off
//! - `pages` - catalog pages, health and security headers
//! - `carousel` - testimonial navigation endpoint

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use martabak_storefront::{app, config::StorefrontConfig, content::Content, state::AppState};
use tower::ServiceExt;

/// Bundled catalog and testimonials shipped with the storefront crate.
#[must_use]
pub fn bundled_content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/content")
}

/// A test client holding the router and the current `cart` cookie, the way
/// a browser would between requests.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Build the storefront app over the bundled content.
    ///
    /// # Panics
    ///
    /// Panics if the bundled content cannot be loaded.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let content = Content::load(&bundled_content_dir()).expect("bundled content loads");
        Self::with_content(content)
    }

    /// Build the storefront app over the given content.
    #[must_use]
    pub fn with_content(content: Content) -> Self {
        let state = AppState::new(StorefrontConfig::default(), content);
        Self {
            router: app(state),
            cookie: None,
        }
    }

    /// The raw `cart=...` pair currently held, if any.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Replace the held cookie pair, e.g. to simulate a tampered cookie.
    pub fn set_cookie(&mut self, pair: impl Into<String>) {
        self.cookie = Some(pair.into());
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// Send a form-encoded POST request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(builder, Body::from(form.to_string())).await
    }

    /// Send a JSON POST request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post_json(&mut self, uri: &str, json: &serde_json::Value) -> TestResponse {
        let builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        self.send(builder, Body::from(json.to_string())).await
    }

    #[allow(clippy::expect_used)]
    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("request builds");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(pair) = cart_cookie_pair(&response) {
            self.cookie = Some(pair);
        }

        TestResponse::read(response).await
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The `name=value` part of the `cart` Set-Cookie header.
fn cart_cookie_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("cart="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: axum::http::StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    #[allow(clippy::expect_used)]
    async fn read(response: Response<Body>) -> Self {
        let (parts, body) = response.into_parts();
        let bytes = body
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        Self {
            status: parts.status,
            headers: parts.headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// A header value as a string, if present and valid.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The full `Set-Cookie` header for the cart, if one was written.
    #[must_use]
    pub fn cart_set_cookie(&self) -> Option<&str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("cart="))
    }

    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("body is JSON")
    }
}
