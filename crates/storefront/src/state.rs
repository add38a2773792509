//! Application state shared across handlers.

use std::sync::Arc;

use martabak_core::carousel::{Carousel, DEFAULT_CARD_WIDTH, DEFAULT_CLONES};

use crate::config::StorefrontConfig;
use crate::content::Content;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds only immutable data:
/// configuration and the content loaded at startup. Cart state never lives
/// here; it travels in the request cookie.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    content: Content,
    carousel: Option<Carousel>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The testimonial carousel is disabled when there are no testimonials.
    #[must_use]
    pub fn new(config: StorefrontConfig, content: Content) -> Self {
        let cards = content.testimonials().len();
        let carousel = match Carousel::new(cards, DEFAULT_CLONES.min(cards), DEFAULT_CARD_WIDTH) {
            Ok(carousel) => Some(carousel),
            Err(e) => {
                tracing::warn!("Testimonial carousel disabled: {e}");
                None
            }
        };

        Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                carousel,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the static content.
    #[must_use]
    pub fn content(&self) -> &Content {
        &self.inner.content
    }

    /// A fresh carousel at offset zero, if testimonials exist.
    #[must_use]
    pub fn carousel(&self) -> Option<Carousel> {
        self.inner.carousel.clone()
    }
}
