//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page (featured products, testimonials)
//! GET  /health                   - Health check
//!
//! # Products
//! GET  /products                 - Product listing (?min_price, ?max_price, ?sort)
//! GET  /products/{slug}          - Product detail
//!
//! # Cart (HTMX fragments, state in the `cart` cookie)
//! GET  /cart                     - Cart page
//! POST /cart/add                 - Add to cart (returns toast, triggers cart-updated)
//! POST /cart/update              - Update quantity (returns cart_items fragment)
//! POST /cart/remove              - Remove item (returns cart_items fragment)
//! POST /cart/clear               - Empty cart (returns cart_items fragment)
//! GET  /cart/count               - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                 - Order summary + hand-off form, or redirect to /cart
//!
//! # Testimonials
//! POST /testimonials/carousel    - Carousel navigation steps (JSON)
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;
pub mod testimonials;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout summary
        .route("/checkout", get(checkout::show))
        // Testimonial carousel
        .route("/testimonials/carousel", post(testimonials::navigate))
}
