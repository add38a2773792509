//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the `cart` cookie: every handler loads it through
//! [`CartStore`], mutates it, and returns the re-saved cookie alongside a
//! freshly rendered fragment. Each mutation also emits an `HX-Trigger:
//! cart-updated` header so the navbar badge refreshes itself.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use martabak_core::{Cart, LineItem, Price, ProductId};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;
use crate::store::CartStore;

/// Event name HTMX listeners use to refresh cart surfaces.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// How long an add-to-cart toast stays visible.
pub const TOAST_DISMISS_MS: u32 = 3000;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
    /// Quantity the decrement control submits (never below one).
    pub decrement: u32,
    /// Quantity the increment control submits.
    pub increment: u32,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        // No tax or shipping: total is the subtotal.
        let subtotal = cart.subtotal().display();
        Self {
            items: cart.items().map(CartItemView::from).collect(),
            total: subtotal.clone(),
            subtotal,
            item_count: cart.item_count(),
        }
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        let quantity = item.quantity();
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity,
            price: item.unit_price.display(),
            line_total: item.line_total().display(),
            decrement: quantity.saturating_sub(1).max(1),
            increment: quantity.saturating_add(1),
        }
    }
}

/// Add-to-cart notification display data.
#[derive(Clone)]
pub struct ToastView {
    pub id: String,
    pub message: String,
    pub dismiss_after_ms: u32,
}

impl ToastView {
    /// A toast confirming that `product_name` was added.
    #[must_use]
    pub fn added(product_name: &str) -> Self {
        Self {
            id: format!("toast-{}", Uuid::new_v4().simple()),
            message: format!("{product_name} added to cart!"),
            dismiss_after_ms: TOAST_DISMISS_MS,
        }
    }
}

/// Add to cart form data.
///
/// Product details come from the add-to-cart control itself. The catalog is
/// only consulted to refuse products that are out of stock.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub image: String,
    pub quantity: Option<i64>,
}

/// Update cart form data.
///
/// `quantity` is whatever the number input held, possibly blank or
/// fractional; see [`UpdateCartForm::requested_quantity`].
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
}

impl UpdateCartForm {
    /// The leading integer of the posted value (`"2.5"` is 2). A value with
    /// no leading integer reads as 0, which removes the item.
    #[must_use]
    pub fn requested_quantity(&self) -> i64 {
        leading_integer(&self.quantity).unwrap_or(0)
    }
}

/// Parse an optionally signed run of digits at the start of `raw`, ignoring
/// leading whitespace and anything after the digits. Saturates on overflow.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = rest.get(..end).filter(|d| !d.is_empty())?;

    // Only overflow can fail here; the run is all digits.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u32,
    pub nonce: String,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add-to-cart notification fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub toast: ToastView,
}

impl AddToCartForm {
    /// Validate the posted fields.
    fn parse(self) -> Result<(ProductId, String, Price, String, NonZeroU32)> {
        let id = self.product_id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("product_id is required".to_string()));
        }

        let price = self
            .price
            .parse::<Price>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let quantity = self.quantity.unwrap_or(1);
        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                AppError::BadRequest(format!("quantity must be at least 1 (got {quantity})"))
            })?;

        Ok((ProductId::new(id), self.name, price, self.image, quantity))
    }
}

/// Render the cart fragment and persist the cart.
fn respond_with_items(store: CartStore, cart: &Cart) -> Result<Response> {
    let jar = store.save(cart)?;
    Ok((
        jar,
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response())
}

/// Display cart page.
#[instrument(skip(store, nonce))]
pub async fn show(store: CartStore, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    let cart = store.load();

    CartShowTemplate {
        cart_count: cart.item_count(),
        cart: CartView::from(&cart),
        nonce,
    }
}

/// Add item to cart (HTMX).
///
/// Adding an id that is already in the cart increases its quantity.
/// Returns a toast fragment and triggers `cart-updated` so the badge refreshes.
///
/// # Errors
///
/// Returns 400 for a missing id, an unparseable price, a quantity below one,
/// or a catalog product that is out of stock.
#[instrument(skip(state, store))]
pub async fn add(
    State(state): State<AppState>,
    store: CartStore,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let (id, name, price, image, quantity) = form.parse()?;

    if let Some(product) = state
        .content()
        .product_by_id(&id)
        .filter(|product| !product.in_stock())
    {
        tracing::debug!(product_id = %id, "Refusing out-of-stock product");
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            product.name
        )));
    }

    let mut cart = store.load();
    let toast = ToastView::added(&name);
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    cart.add_item(id, name, price, image, quantity);

    tracing::info!(
        item_count = cart.item_count(),
        subtotal = %cart.subtotal().to_plain_string(),
        "Item added to cart"
    );

    let jar = store.save(&cart)?;
    Ok((
        jar,
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        ToastTemplate { toast },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// A quantity of zero or less, or one that does not start with an integer,
/// removes the item.
///
/// # Errors
///
/// Returns 500 if the cart cannot be written back to the cookie.
#[instrument(skip(store))]
pub async fn update(store: CartStore, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart = store.load();
    let quantity = form.requested_quantity();
    cart.set_quantity(&ProductId::new(form.product_id), quantity);
    respond_with_items(store, &cart)
}

/// Remove item from cart (HTMX).
///
/// # Errors
///
/// Returns 500 if the cart cannot be written back to the cookie.
#[instrument(skip(store))]
pub async fn remove(store: CartStore, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = store.load();
    if cart.remove_item(&ProductId::new(form.product_id)).is_some() {
        add_breadcrumb("cart", "Removed from cart", None);
    }
    respond_with_items(store, &cart)
}

/// Empty the cart (HTMX).
///
/// # Errors
///
/// Returns 500 if the cart cannot be written back to the cookie.
#[instrument(skip(store))]
pub async fn clear(store: CartStore) -> Result<Response> {
    let mut cart = store.load();
    cart.clear();
    add_breadcrumb("cart", "Cleared cart", None);
    respond_with_items(store, &cart)
}

/// Get cart count badge (HTMX).
#[instrument(skip(store))]
pub async fn count(store: CartStore) -> impl IntoResponse {
    CartCountTemplate {
        count: store.load().item_count(),
    }
}
