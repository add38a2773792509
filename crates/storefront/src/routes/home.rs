//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use martabak_core::Testimonial;
use tracing::instrument;

use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::products::ProductView;
use crate::state::AppState;
use crate::store::CartStore;

// =============================================================================
// Testimonial Track
// =============================================================================

/// A single card on the testimonial track.
#[derive(Clone)]
pub struct TestimonialView {
    pub star_count: usize,
    pub text: String,
    pub author: String,
    /// Tail clone used for seamless looping; hidden from assistive tech.
    pub is_clone: bool,
}

impl TestimonialView {
    fn new(testimonial: &Testimonial, is_clone: bool) -> Self {
        Self {
            star_count: usize::from(testimonial.rating.stars()),
            text: testimonial.text.clone(),
            author: testimonial.author.clone(),
            is_clone,
        }
    }
}

/// The rendered carousel track: real cards followed by leading clones.
#[derive(Clone)]
pub struct TestimonialTrack {
    pub cards: Vec<TestimonialView>,
    pub card_width: i32,
    pub offset: i32,
}

impl TestimonialTrack {
    /// Lay out `testimonials` on a track of `track_len` cards.
    ///
    /// Cards past the end of the list repeat the list from the start.
    #[must_use]
    pub fn new(testimonials: &[Testimonial], track_len: usize, card_width: i32) -> Self {
        let cards = testimonials
            .iter()
            .cycle()
            .take(track_len)
            .enumerate()
            .map(|(position, testimonial)| {
                TestimonialView::new(testimonial, position >= testimonials.len())
            })
            .collect();

        Self {
            cards,
            card_width,
            offset: 0,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductView>,
    pub track: Option<TestimonialTrack>,
    pub cart_count: u32,
    pub nonce: String,
}

/// Display the home page.
#[instrument(skip(state, store, nonce))]
pub async fn home(
    State(state): State<AppState>,
    store: CartStore,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let content = state.content();
    let track = state.carousel().map(|carousel| {
        TestimonialTrack::new(
            content.testimonials(),
            carousel.track_len(),
            carousel.card_width(),
        )
    });

    HomeTemplate {
        featured: content.featured_products().map(ProductView::from).collect(),
        track,
        cart_count: store.load().item_count(),
        nonce,
    }
}
