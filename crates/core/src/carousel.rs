//! Looped, draggable carousel positioning.
//!
//! The track holds the real cards followed by a few clones of the first
//! cards. Positions are horizontal pixel offsets (`0` shows card 0, `-w`
//! shows card 1, and so on). Every movement is returned as a list of
//! [`Step`]s that the page applies in order: an animated step slides the
//! track, an instant step moves it with the CSS transition disabled for one
//! frame.
//!
//! Crossing the loop boundary never animates backwards:
//!
//! ```text
//! next from last card:  animate onto clone of card 0, then snap to 0
//! prev from card 0:     snap to clone of card 0, then animate to last card
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of one card including its margin, in pixels.
pub const DEFAULT_CARD_WIDTH: i32 = 320;

/// Number of leading cards cloned onto the tail of the track.
pub const DEFAULT_CLONES: usize = 3;

/// Errors constructing a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CarouselError {
    #[error("carousel needs at least one card")]
    NoCards,
    #[error("carousel needs at least one cloned card to loop")]
    NoClones,
    #[error("cannot clone {clones} cards from a list of {cards}")]
    TooManyClones { clones: usize, cards: usize },
    #[error("card width must be positive (got {0})")]
    InvalidCardWidth(i32),
    #[error("track is too long to address in pixels")]
    TrackTooLong,
}

/// How a step moves the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Animated,
    Instant,
}

/// One positioning instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub offset: i32,
    pub transition: Transition,
}

impl Step {
    const fn animated(offset: i32) -> Self {
        Self {
            offset,
            transition: Transition::Animated,
        }
    }

    const fn instant(offset: i32) -> Self {
        Self {
            offset,
            transition: Transition::Instant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    pointer_start: i32,
    offset_start: i32,
}

/// Carousel position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    cards: i32,
    clones: i32,
    card_width: i32,
    offset: i32,
    drag: Option<Drag>,
}

impl Carousel {
    /// Create a carousel over `cards` real cards with `clones` tail clones.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no cards or clones, more clones than
    /// cards, a non-positive card width, or a track whose pixel length
    /// overflows.
    pub fn new(cards: usize, clones: usize, card_width: i32) -> Result<Self, CarouselError> {
        if cards == 0 {
            return Err(CarouselError::NoCards);
        }
        if clones == 0 {
            return Err(CarouselError::NoClones);
        }
        if clones > cards {
            return Err(CarouselError::TooManyClones { clones, cards });
        }
        if card_width <= 0 {
            return Err(CarouselError::InvalidCardWidth(card_width));
        }

        cards
            .checked_add(clones)
            .and_then(|len| i32::try_from(len).ok())
            .and_then(|len| len.checked_mul(card_width))
            .ok_or(CarouselError::TrackTooLong)?;

        // Both fit because their sum times a positive width fits.
        let cards = i32::try_from(cards).map_err(|_| CarouselError::TrackTooLong)?;
        let clones = i32::try_from(clones).map_err(|_| CarouselError::TrackTooLong)?;

        Ok(Self {
            cards,
            clones,
            card_width,
            offset: 0,
            drag: None,
        })
    }

    /// Resume from an offset previously reported to the page.
    #[must_use]
    pub const fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    #[must_use]
    pub const fn card_width(&self) -> i32 {
        self.card_width
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Number of cards on the track, clones included.
    #[must_use]
    pub fn track_len(&self) -> usize {
        usize::try_from(self.cards + self.clones).unwrap_or(0)
    }

    /// Index of the real card nearest the current offset.
    #[must_use]
    pub fn index(&self) -> usize {
        let nearest = self.nearest_units().saturating_neg();
        usize::try_from(nearest.rem_euclid(self.cards)).unwrap_or(0)
    }

    /// Advance one card.
    pub fn next(&mut self) -> Vec<Step> {
        let index = self.index_i32();
        if index + 1 >= self.cards {
            self.offset = 0;
            return vec![
                Step::animated(self.offset_of(self.cards)),
                Step::instant(self.offset),
            ];
        }

        self.offset = self.offset_of(index + 1);
        vec![Step::animated(self.offset)]
    }

    /// Go back one card.
    pub fn prev(&mut self) -> Vec<Step> {
        let index = self.index_i32();
        if index == 0 {
            self.offset = self.offset_of(self.cards - 1);
            return vec![
                Step::instant(self.offset_of(self.cards)),
                Step::animated(self.offset),
            ];
        }

        self.offset = self.offset_of(index - 1);
        vec![Step::animated(self.offset)]
    }

    /// Begin a pointer drag at horizontal position `pointer_x`.
    pub const fn start_drag(&mut self, pointer_x: i32) {
        self.drag = Some(Drag {
            pointer_start: pointer_x,
            offset_start: self.offset,
        });
    }

    /// Follow the pointer. Returns `None` when no drag is in progress.
    pub fn drag_to(&mut self, pointer_x: i32) -> Option<Step> {
        let drag = self.drag?;
        let delta = pointer_x.saturating_sub(drag.pointer_start);
        self.offset = drag.offset_start.saturating_add(delta);
        Some(Step::instant(self.offset))
    }

    /// Release the pointer: snap to the nearest card, then wrap.
    pub fn end_drag(&mut self) -> Vec<Step> {
        self.drag = None;
        let card = self.nearest_units().saturating_neg();

        if card < 0 {
            self.offset = self.offset_of(self.cards - 1);
            return vec![Step::animated(self.offset)];
        }

        if card >= self.cards {
            let card = card.min(self.cards + self.clones - 1);
            self.offset = self.offset_of(card - self.cards);
            return vec![
                Step::animated(self.offset_of(card)),
                Step::instant(self.offset),
            ];
        }

        self.offset = self.offset_of(card);
        vec![Step::animated(self.offset)]
    }

    fn index_i32(&self) -> i32 {
        i32::try_from(self.index()).unwrap_or(0)
    }

    const fn offset_of(&self, card: i32) -> i32 {
        -(card * self.card_width)
    }

    /// `Math.round(offset / width)` in integer arithmetic.
    fn nearest_units(&self) -> i32 {
        let offset = i64::from(self.offset);
        let width = i64::from(self.card_width);
        let units = (2 * offset + width).div_euclid(2 * width);
        i32::try_from(units).unwrap_or(if units < 0 { i32::MIN } else { i32::MAX })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn carousel() -> Carousel {
        Carousel::new(6, DEFAULT_CLONES, DEFAULT_CARD_WIDTH).unwrap()
    }

    #[test]
    fn test_rejects_invalid_configurations() {
        assert_eq!(Carousel::new(0, 1, 320), Err(CarouselError::NoCards));
        assert_eq!(Carousel::new(3, 0, 320), Err(CarouselError::NoClones));
        assert_eq!(
            Carousel::new(2, 3, 320),
            Err(CarouselError::TooManyClones {
                clones: 3,
                cards: 2
            })
        );
        assert_eq!(
            Carousel::new(3, 1, 0),
            Err(CarouselError::InvalidCardWidth(0))
        );
        assert_eq!(
            Carousel::new(usize::MAX, 1, 320),
            Err(CarouselError::TrackTooLong)
        );
    }

    #[test]
    fn test_next_moves_one_card() {
        let mut c = carousel();
        assert_eq!(c.next(), vec![Step::animated(-320)]);
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn test_next_full_loop_returns_to_start() {
        let mut c = carousel();
        for _ in 0..6 {
            c.next();
        }
        assert_eq!(c.offset(), 0);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_next_from_last_card_snaps_after_clone() {
        let mut c = carousel().with_offset(-1600);
        assert_eq!(
            c.next(),
            vec![Step::animated(-1920), Step::instant(0)]
        );
    }

    #[test]
    fn test_prev_from_first_card_snaps_then_animates() {
        let mut c = carousel();
        assert_eq!(
            c.prev(),
            vec![Step::instant(-1920), Step::animated(-1600)]
        );
        assert_eq!(c.index(), 5);
    }

    #[test]
    fn test_prev_full_loop_returns_to_start() {
        let mut c = carousel();
        for _ in 0..6 {
            c.prev();
        }
        assert_eq!(c.offset(), 0);
    }

    #[test]
    fn test_drag_tracks_pointer_delta() {
        let mut c = carousel().with_offset(-320);
        assert_eq!(c.drag_to(10), None);

        c.start_drag(500);
        assert!(c.is_dragging());
        assert_eq!(c.drag_to(380), Some(Step::instant(-440)));
        assert_eq!(c.offset(), -440);
    }

    #[test]
    fn test_release_snaps_to_nearest_card() {
        let mut c = carousel();
        c.start_drag(500);
        c.drag_to(100);
        assert_eq!(c.end_drag(), vec![Step::animated(-320)]);
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_release_half_way_rounds_like_math_round() {
        // -1.5 cards rounds toward +infinity, i.e. card 1.
        let mut c = carousel().with_offset(-480);
        assert_eq!(c.end_drag(), vec![Step::animated(-320)]);
    }

    #[test]
    fn test_release_past_tail_wraps_to_equivalent_card() {
        let mut c = carousel().with_offset(-1600);
        c.start_drag(0);
        c.drag_to(-650);
        assert_eq!(
            c.end_drag(),
            vec![Step::animated(-2240), Step::instant(-320)]
        );
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn test_release_far_past_tail_is_clamped_to_last_clone() {
        let mut c = carousel().with_offset(-10_000);
        assert_eq!(
            c.end_drag(),
            vec![Step::animated(-2560), Step::instant(-640)]
        );
    }

    #[test]
    fn test_release_before_first_card_wraps_to_last() {
        let mut c = carousel();
        c.start_drag(0);
        c.drag_to(200);
        assert_eq!(c.end_drag(), vec![Step::animated(-1600)]);
    }

    #[test]
    fn test_track_len_includes_clones() {
        assert_eq!(carousel().track_len(), 9);
    }
}
