//! Testimonial carousel navigation.
//!
//! The page keeps the current track offset in the DOM and asks this endpoint
//! how to move: the response is the ordered list of positioning steps to
//! apply (animated slides and instant, transition-less snaps) plus the
//! offset to remember afterwards. Pointer moves during a drag are applied
//! locally; only the release is sent here.

use axum::{Json, extract::State};
use martabak_core::carousel::Step;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// A carousel gesture.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CarouselRequest {
    /// Forward button.
    Next { offset: i32 },
    /// Back button.
    Prev { offset: i32 },
    /// Pointer released after a drag that started at `offset`.
    Release {
        offset: i32,
        pointer_start: i32,
        pointer_end: i32,
    },
}

/// Steps to apply and the resulting resting offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselResponse {
    pub offset: i32,
    pub steps: Vec<Step>,
}

/// Compute the next carousel position.
///
/// # Errors
///
/// Returns 404 when the carousel is disabled (no testimonials).
#[instrument(skip(state))]
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<CarouselRequest>,
) -> Result<Json<CarouselResponse>> {
    let carousel = state
        .carousel()
        .ok_or_else(|| AppError::NotFound("testimonial carousel".to_string()))?;

    let (carousel, steps) = match request {
        CarouselRequest::Next { offset } => {
            let mut carousel = carousel.with_offset(offset);
            let steps = carousel.next();
            (carousel, steps)
        }
        CarouselRequest::Prev { offset } => {
            let mut carousel = carousel.with_offset(offset);
            let steps = carousel.prev();
            (carousel, steps)
        }
        CarouselRequest::Release {
            offset,
            pointer_start,
            pointer_end,
        } => {
            let mut carousel = carousel.with_offset(offset);
            carousel.start_drag(pointer_start);
            carousel.drag_to(pointer_end);
            let steps = carousel.end_drag();
            (carousel, steps)
        }
    };

    Ok(Json(CarouselResponse {
        offset: carousel.offset(),
        steps,
    }))
}
