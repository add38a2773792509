//! Integration tests for the cookie cart.
//!
//! Every mutation goes through the HTTP surface and the cart travels only
//! in the `cart` cookie carried by `TestClient`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use martabak_core::{Cart, ProductId};
use martabak_integration_tests::TestClient;

const TELUR: &str = "product_id=1&name=Martabak+Telur+Spesial&price=35000\
                     &image=%2Fstatic%2Fimages%2Fproducts%2Fmartabak-telur.jpg";
const COKLAT_KEJU: &str = "product_id=2&name=Martabak+Manis+Coklat+Keju&price=45000";

/// Decode the cart the client currently holds, the way `CartStore` reads it.
fn held_cart(client: &TestClient) -> Cart {
    let cookie = Cookie::parse_encoded(client.cookie().unwrap()).unwrap();
    Cart::from_json(cookie.value()).unwrap()
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_sets_cookie_and_returns_toast() {
    let mut client = TestClient::new();

    let resp = client
        .post_form("/cart/add", &format!("{TELUR}&quantity=2"))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains("Martabak Telur Spesial added to cart!"));
    assert!(resp.body.contains("data-autohide-ms=\"3000\""));

    let set_cookie = resp.cart_set_cookie().unwrap();
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("HttpOnly"));

    let cart = held_cart(&client);
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity(), 2);
}

#[tokio::test]
async fn test_add_twice_accumulates_quantity() {
    let mut client = TestClient::new();

    client.post_form("/cart/add", TELUR).await;
    client
        .post_form("/cart/add", &format!("{TELUR}&quantity=3"))
        .await;

    let cart = held_cart(&client);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.item_count(), 4);
}

#[tokio::test]
async fn test_add_rejects_non_positive_quantity() {
    let mut client = TestClient::new();

    let resp = client
        .post_form("/cart/add", &format!("{TELUR}&quantity=0"))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = client
        .post_form("/cart/add", &format!("{TELUR}&quantity=-2"))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(client.cookie().is_none());
}

#[tokio::test]
async fn test_add_refuses_out_of_stock_product() {
    let mut client = TestClient::new();
    let resp = client
        .post_form("/cart/add", "product_id=6&name=Martabak+Keju+Susu&price=42000")
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body.contains("Martabak Keju Susu is out of stock"));
    assert!(client.cookie().is_none());
}

#[tokio::test]
async fn test_add_rejects_bad_price() {
    let mut client = TestClient::new();
    let resp = client
        .post_form("/cart/add", "product_id=1&name=X&price=gratis")
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Badge
// =============================================================================

#[tokio::test]
async fn test_count_badge_tracks_item_count() {
    let mut client = TestClient::new();

    let resp = client.get("/cart/count").await;
    assert_eq!(resp.body.trim(), "0");

    client
        .post_form("/cart/add", &format!("{TELUR}&quantity=2"))
        .await;
    client.post_form("/cart/add", COKLAT_KEJU).await;

    let resp = client.get("/cart/count").await;
    assert_eq!(resp.body.trim(), "3");
}

#[tokio::test]
async fn test_corrupted_cookie_reads_as_empty_cart() {
    let mut client = TestClient::new();
    client.set_cookie("cart=%7Bnot-json");

    let resp = client.get("/cart/count").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.trim(), "0");

    let resp = client.get("/cart").await;
    assert!(resp.body.contains("Your cart is empty"));
}

// =============================================================================
// Update / Remove / Clear
// =============================================================================

#[tokio::test]
async fn test_cart_page_shows_summary() {
    let mut client = TestClient::new();
    client
        .post_form("/cart/add", &format!("{TELUR}&quantity=2"))
        .await;
    client.post_form("/cart/add", COKLAT_KEJU).await;

    let resp = client.get("/cart").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("id=\"cart-items-container\""));
    assert!(resp.body.contains("id=\"cart-subtotal\">Rp 115000<"));
    assert!(resp.body.contains("id=\"cart-total\">Rp 115000<"));
    assert!(resp.body.contains("id=\"cart-count\""));
}

#[tokio::test]
async fn test_update_sets_quantity_and_rerenders() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", TELUR).await;

    let resp = client
        .post_form("/cart/update", "product_id=1&quantity=5")
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains("id=\"cart-subtotal\">Rp 175000<"));
    assert_eq!(held_cart(&client).item_count(), 5);
}

#[tokio::test]
async fn test_update_to_zero_removes_item() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", TELUR).await;
    client.post_form("/cart/add", COKLAT_KEJU).await;

    client
        .post_form("/cart/update", "product_id=1&quantity=0")
        .await;

    let cart = held_cart(&client);
    assert!(cart.get(&ProductId::new("1")).is_none());
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn test_update_with_blank_quantity_removes_item() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", TELUR).await;
    client.post_form("/cart/add", COKLAT_KEJU).await;

    let resp = client.post_form("/cart/update", "product_id=1&quantity=").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(held_cart(&client).get(&ProductId::new("1")).is_none());

    // a missing field behaves the same
    let resp = client.post_form("/cart/update", "product_id=2").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_update_with_fractional_quantity_truncates() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", TELUR).await;

    let resp = client
        .post_form("/cart/update", "product_id=1&quantity=2.5")
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("id=\"cart-subtotal\">Rp 70000<"));
    assert_eq!(held_cart(&client).item_count(), 2);
}

#[tokio::test]
async fn test_update_unknown_id_is_noop() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", TELUR).await;
    let before = held_cart(&client);

    let resp = client
        .post_form("/cart/update", "product_id=999&quantity=4")
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(held_cart(&client), before);
}

#[tokio::test]
async fn test_remove_last_item_shows_empty_state() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", TELUR).await;

    let resp = client.post_form("/cart/remove", "product_id=1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty"));
    assert!(!resp.body.contains("id=\"cart-summary\""));
    assert!(held_cart(&client).is_empty());
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", TELUR).await;
    client.post_form("/cart/add", COKLAT_KEJU).await;

    let resp = client.post_form("/cart/clear", "").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty"));

    let resp = client.get("/cart/count").await;
    assert_eq!(resp.body.trim(), "0");
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_with_empty_cart_redirects() {
    let mut client = TestClient::new();

    let resp = client.get("/checkout").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.header("location"), Some("/cart"));
}

#[tokio::test]
async fn test_checkout_renders_hand_off_fields() {
    let mut client = TestClient::new();
    client
        .post_form("/cart/add", &format!("{TELUR}&quantity=2"))
        .await;
    client.post_form("/cart/add", COKLAT_KEJU).await;

    let resp = client.get("/checkout").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Martabak Telur Spesial x 2"));
    assert!(resp.body.contains("id=\"checkout-total\">Rp 115000<"));
    assert!(
        resp.body
            .contains("id=\"order-total\" name=\"order_total\" value=\"115000\"")
    );
    assert!(resp.body.contains("id=\"order-items\" name=\"order_items\""));
    assert!(resp.body.contains("action=\"/place-order/\""));
    assert!(resp.body.contains("name=\"full_name\""));
}
