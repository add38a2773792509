//! Martabak Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront:
//! - the cookie-persisted shopping [`Cart`] and its [`LineItem`]s
//! - decimal rupiah [`Price`]s
//! - [`Testimonial`]s and the looped testimonial [`carousel::Carousel`]
//!
//! # Architecture
//!
//! The core crate contains only types and state machines - no I/O, no HTTP,
//! no cookies. Persistence and rendering live in `martabak-storefront`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, the cart, and testimonials
//! - [`carousel`] - Offset arithmetic for the looped, draggable carousel

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod types;

pub use types::*;
