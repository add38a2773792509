//! Customer testimonials shown in the home page carousel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest allowed star rating.
pub const MIN_RATING: u8 = 1;
/// Highest allowed star rating.
pub const MAX_RATING: u8 = 5;

/// Errors that can occur when validating a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("rating {0} is outside {MIN_RATING}..={MAX_RATING}")]
    OutOfRange(u8),
}

/// A star rating between one and five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate and wrap a star count.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` unless `stars` is within 1..=5.
    pub const fn new(stars: u8) -> Result<Self, RatingError> {
        if stars < MIN_RATING || stars > MAX_RATING {
            return Err(RatingError::OutOfRange(stars));
        }
        Ok(Self(stars))
    }

    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A single customer quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub rating: Rating,
    pub text: String,
    pub author: String,
}
