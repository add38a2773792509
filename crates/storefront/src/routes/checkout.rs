//! Checkout route handler.
//!
//! Renders a read-only order summary and prepares the hand-off payload for
//! the external order endpoint: the full cart JSON and the numeric subtotal
//! travel in hidden form fields. Submitting the order is not handled here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use martabak_core::Cart;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::cart::CartView;
use crate::state::AppState;
use crate::store::CartStore;

/// Hidden-field payload consumed by the order endpoint.
#[derive(Clone)]
pub struct OrderPayload {
    /// Cart JSON, same shape as the `cart` cookie.
    pub order_items: String,
    /// Numeric subtotal (e.g. `45000`).
    pub order_total: String,
}

impl OrderPayload {
    /// Build the payload for a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized.
    pub fn from_cart(cart: &Cart) -> Result<Self> {
        Ok(Self {
            order_items: cart.to_json()?,
            order_total: cart.subtotal().to_plain_string(),
        })
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub payload: OrderPayload,
    pub order_submit_url: String,
    pub cart_count: u32,
    pub nonce: String,
}

/// Display the checkout page.
///
/// An empty cart redirects to `/cart` before anything is rendered.
///
/// # Errors
///
/// Returns 500 if the cart cannot be serialized into the hand-off payload.
#[instrument(skip(state, store, nonce))]
pub async fn show(
    State(state): State<AppState>,
    store: CartStore,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let cart = store.load();
    if cart.is_empty() {
        tracing::debug!("Checkout with empty cart, redirecting to cart page");
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(CheckoutTemplate {
        payload: OrderPayload::from_cart(&cart)?,
        cart_count: cart.item_count(),
        cart: CartView::from(&cart),
        order_submit_url: state.config().order_submit_url.clone(),
        nonce,
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use martabak_core::{Price, ProductId};

    use super::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            ProductId::new("A"),
            "Martabak Telur",
            Price::from_whole(10000),
            "",
            NonZeroU32::new(2).unwrap(),
        );
        cart.add_item(
            ProductId::new("B"),
            "Martabak Manis",
            Price::from_whole(25000),
            "",
            NonZeroU32::new(1).unwrap(),
        );
        cart
    }

    #[test]
    fn test_payload_round_trips_cart() {
        let cart = sample_cart();
        let payload = OrderPayload::from_cart(&cart).unwrap();
        assert_eq!(payload.order_total, "45000");
        assert_eq!(Cart::from_json(&payload.order_items).unwrap(), cart);
    }

    #[test]
    fn test_checkout_renders_summary_and_hidden_fields() {
        let cart = sample_cart();
        let html = CheckoutTemplate {
            cart: CartView::from(&cart),
            payload: OrderPayload::from_cart(&cart).unwrap(),
            order_submit_url: "/place-order/".to_string(),
            cart_count: cart.item_count(),
            nonce: "test-nonce".to_string(),
        }
        .render()
        .unwrap();

        assert!(html.contains("id=\"checkout-items-container\""));
        assert!(html.contains("Martabak Telur x 2"));
        assert!(html.contains("id=\"checkout-total\">Rp 45000<"));
        assert!(html.contains("id=\"order-total\" name=\"order_total\" value=\"45000\""));
        assert!(html.contains("id=\"order-items\" name=\"order_items\""));
        assert!(html.contains("action=\"/place-order/\""));
    }
}
