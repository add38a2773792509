//! Cookie-backed cart persistence.
//!
//! The browser cookie is the only durable copy of the cart. Each request
//! hydrates a [`Cart`] from the `cart` cookie and every mutation writes the
//! whole cart back with a fresh 7-day window. There is no server-side mirror,
//! so two tabs race and the last write wins.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use martabak_core::{Cart, CartCodecError};
use time::{Duration, OffsetDateTime};

use crate::state::AppState;

/// Cart cookie name.
pub const CART_COOKIE_NAME: &str = "cart";

/// How long a saved cart stays fresh, in days.
pub const CART_TTL_DAYS: i64 = 7;

/// Per-request handle on the cart cookie.
///
/// Extract it in a handler, `load()` the cart, mutate it, then return the
/// jar from `save()` as part of the response so the `Set-Cookie` header is
/// written.
#[derive(Debug, Clone)]
pub struct CartStore {
    jar: CookieJar,
    secure: bool,
}

impl CartStore {
    /// Wrap a cookie jar.
    #[must_use]
    pub const fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    /// Read the persisted cart, or an empty cart if it is absent,
    /// unparseable, or expired.
    ///
    /// The 7-day expiry is enforced by the browser, which drops the cookie
    /// once `Max-Age` lapses. A request `Cookie` header carries no expiry, so
    /// the check here only applies to jars that still hold the attributes
    /// from [`save`](Self::save).
    #[must_use]
    pub fn load(&self) -> Cart {
        self.load_at(OffsetDateTime::now_utc())
    }

    /// [`load`](Self::load) against an explicit clock.
    #[must_use]
    pub fn load_at(&self, now: OffsetDateTime) -> Cart {
        let Some(cookie) = self.jar.get(CART_COOKIE_NAME) else {
            return Cart::new();
        };

        // Browsers enforce the window via Max-Age and never send Expires back
        // in a Cookie header, so this only trips for jars built server-side.
        if cookie
            .expires_datetime()
            .is_some_and(|expires| expires <= now)
        {
            tracing::debug!("Cart cookie expired, starting empty");
            return Cart::new();
        }

        Cart::from_json(cookie.value()).unwrap_or_else(|e| {
            tracing::debug!("Discarding unreadable cart cookie: {e}");
            Cart::new()
        })
    }

    /// Persist the cart, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized.
    pub fn save(self, cart: &Cart) -> Result<CookieJar, CartCodecError> {
        self.save_at(cart, OffsetDateTime::now_utc())
    }

    /// [`save`](Self::save) against an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized.
    pub fn save_at(self, cart: &Cart, now: OffsetDateTime) -> Result<CookieJar, CartCodecError> {
        let ttl = Duration::days(CART_TTL_DAYS);
        let cookie = Cookie::build((CART_COOKIE_NAME, cart.to_json()?))
            .path("/")
            .max_age(ttl)
            .expires(now + ttl)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .http_only(false);

        Ok(self.jar.add(cookie))
    }
}

impl FromRequestParts<AppState> for CartStore {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self::new(jar, state.config().secure_cookies()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
    use martabak_core::{Price, ProductId};

    use super::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            ProductId::new("1"),
            "Martabak Telur Spesial",
            Price::from_whole(35000),
            "/static/images/products/martabak-telur.jpg",
            NonZeroU32::new(2).unwrap(),
        );
        cart
    }

    #[test]
    fn test_absent_cookie_loads_empty() {
        let store = CartStore::new(CookieJar::new(), false);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let cart = sample_cart();
        let jar = CartStore::new(CookieJar::new(), false).save(&cart).unwrap();

        let reloaded = CartStore::new(jar, false).load();
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn test_saved_cookie_attributes() {
        let now = OffsetDateTime::now_utc();
        let jar = CartStore::new(CookieJar::new(), true)
            .save_at(&sample_cart(), now)
            .unwrap();
        let cookie = jar.get(CART_COOKIE_NAME).unwrap();

        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(CART_TTL_DAYS)));
        assert_eq!(cookie.expires_datetime(), Some(now + Duration::days(CART_TTL_DAYS)));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_expired_cookie_loads_empty() {
        let saved_at = OffsetDateTime::now_utc();
        let jar = CartStore::new(CookieJar::new(), false)
            .save_at(&sample_cart(), saved_at)
            .unwrap();
        let store = CartStore::new(jar, false);

        assert!(!store.load_at(saved_at + Duration::days(6)).is_empty());
        assert!(store.load_at(saved_at + Duration::days(CART_TTL_DAYS)).is_empty());
    }

    #[test]
    fn test_request_cookie_header_has_no_expiry() {
        let sent = Cookie::new(CART_COOKIE_NAME, sample_cart().to_json().unwrap());
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&sent.encoded().to_string()).unwrap(),
        );
        let store = CartStore::new(CookieJar::from_headers(&headers), false);

        // Only the browser can expire it; the server sees a bare value.
        let far_future = OffsetDateTime::now_utc() + Duration::days(CART_TTL_DAYS * 10);
        assert_eq!(store.load_at(far_future), sample_cart());
    }

    #[test]
    fn test_corrupted_cookie_loads_empty() {
        let jar = CookieJar::new().add(Cookie::new(CART_COOKIE_NAME, "{not json"));
        assert!(CartStore::new(jar, false).load().is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let jar = CartStore::new(CookieJar::new(), false)
            .save(&sample_cart())
            .unwrap();
        let jar = CartStore::new(jar, false).save(&Cart::new()).unwrap();

        assert!(CartStore::new(jar, false).load().is_empty());
    }
}
