//! Core types for the Martabak storefront.
//!
//! This module provides type-safe wrappers for catalog ids, prices, the cart
//! itself, and testimonials.

pub mod cart;
pub mod id;
pub mod price;
pub mod testimonial;

pub use cart::{Cart, CartCodecError, LineItem};
pub use id::*;
pub use price::{Price, PriceError};
pub use testimonial::{Rating, RatingError, Testimonial};
