//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fill the span field, echo `x-request-id`)
//! 4. CSP nonce (generate per-request nonce)
//! 5. Security headers (CSP built from the nonce, framing, sniffing)

pub mod csp;
pub mod request_id;
pub mod security_headers;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
pub use security_headers::security_headers_middleware;
