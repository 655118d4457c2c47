//! Interaction state of the card currently on screen.
//!
//! Photo taps, double-tap likes, the info panel and the "viewed" flag all
//! live here. Like mutations are performed by the caller; this type only
//! guards against duplicate submissions and folds the outcome back in.

use matchfeed_types::{Card, LikeOutcome, UserId};

use crate::gesture::{DOUBLE_TAP_DELAY_MS, Tap, TapDetector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoStep {
    Previous,
    Next,
}

impl PhotoStep {
    /// Left half of the photo goes back, right half goes forward
    pub fn from_position(x: f64, width: f64) -> Self {
        if x < width / 2.0 {
            PhotoStep::Previous
        } else {
            PhotoStep::Next
        }
    }
}

/// What the caller should do after a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TapAction {
    /// First interaction with this card: send the view mutation
    pub mark_viewed: bool,
    /// Double tap accepted: send the like mutation
    pub like: bool,
}

/// Outcome of a finished like or superlike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeResult {
    pub liked: bool,
    /// Open the match dialog
    pub show_match: bool,
    /// Play the heart animation
    pub show_heart: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingTap {
    at_ms: u64,
    step: PhotoStep,
}

#[derive(Debug, Clone)]
pub struct CardView {
    user_id: UserId,
    photo_count: usize,
    photo_index: usize,
    liked: bool,
    viewed: bool,
    info_open: bool,
    like_pending: bool,
    superlike_pending: bool,
    pending_tap: Option<PendingTap>,
    touches: TapDetector,
}

impl CardView {
    pub fn for_card(card: &Card) -> Self {
        Self {
            user_id: card.user_id.clone(),
            photo_count: card.photos.len(),
            photo_index: 0,
            liked: card.is_liked,
            viewed: false,
            info_open: false,
            like_pending: false,
            superlike_pending: false,
            pending_tap: None,
            touches: TapDetector::new(),
        }
    }

    /// Re-sync with the card on screen. A different card resets everything;
    /// the same card only picks up its liked flag.
    pub fn sync(&mut self, card: &Card) {
        if card.user_id != self.user_id {
            *self = Self::for_card(card);
        } else {
            self.liked = card.is_liked;
            self.photo_count = card.photos.len();
            self.photo_index = self.photo_index.min(self.photo_count.saturating_sub(1));
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn photo_index(&self) -> usize {
        self.photo_index
    }

    pub fn is_liked(&self) -> bool {
        self.liked
    }

    pub fn is_viewed(&self) -> bool {
        self.viewed
    }

    pub fn is_info_open(&self) -> bool {
        self.info_open
    }

    /// Returns true the first time only
    pub fn mark_viewed(&mut self) -> bool {
        !std::mem::replace(&mut self.viewed, true)
    }

    pub fn open_info(&mut self) {
        self.info_open = true;
    }

    pub fn close_info(&mut self) {
        self.info_open = false;
    }

    pub fn step_photo(&mut self, step: PhotoStep) -> usize {
        if self.photo_count == 0 {
            return 0;
        }
        let last = self.photo_count - 1;
        self.photo_index = match step {
            PhotoStep::Previous if self.photo_index == 0 => last,
            PhotoStep::Previous => self.photo_index - 1,
            PhotoStep::Next if self.photo_index >= last => 0,
            PhotoStep::Next => self.photo_index + 1,
        };
        self.photo_index
    }

    /// Click on the photo. A single click is held back for the double-tap
    /// window and applied by [`CardView::settle`]; a second click inside the
    /// window cancels it and requests a like instead.
    pub fn on_click(&mut self, x: f64, width: f64, at_ms: u64) -> TapAction {
        let mark_viewed = self.mark_viewed();

        match self.pending_tap.take() {
            Some(pending) if at_ms.saturating_sub(pending.at_ms) < DOUBLE_TAP_DELAY_MS => {
                TapAction {
                    mark_viewed,
                    like: self.begin_like(),
                }
            }
            expired => {
                if let Some(pending) = expired {
                    self.step_photo(pending.step);
                }
                self.pending_tap = Some(PendingTap {
                    at_ms,
                    step: PhotoStep::from_position(x, width),
                });
                TapAction {
                    mark_viewed,
                    like: false,
                }
            }
        }
    }

    /// Apply a held-back single click once its window has passed.
    /// Returns the new photo index if one was applied.
    pub fn settle(&mut self, now_ms: u64) -> Option<usize> {
        let pending = self.pending_tap?;
        if now_ms.saturating_sub(pending.at_ms) < DOUBLE_TAP_DELAY_MS {
            return None;
        }
        self.pending_tap = None;
        Some(self.step_photo(pending.step))
    }

    /// Touch start on the photo; only double taps matter here
    pub fn on_touch(&mut self, at_ms: u64) -> TapAction {
        match self.touches.tap(at_ms) {
            Tap::Double => TapAction {
                mark_viewed: self.mark_viewed(),
                like: self.begin_like(),
            },
            Tap::Single => TapAction::default(),
        }
    }

    /// Claim the like slot. False while another like is still in flight.
    pub fn begin_like(&mut self) -> bool {
        !std::mem::replace(&mut self.like_pending, true)
    }

    /// Fold a like response back in; `None` means the mutation failed.
    pub fn finish_like(&mut self, outcome: Option<LikeOutcome>) -> LikeResult {
        self.like_pending = false;
        let Some(outcome) = outcome else {
            return LikeResult {
                liked: self.liked,
                ..LikeResult::default()
            };
        };

        self.liked = outcome.liked;
        LikeResult {
            liked: outcome.liked,
            show_match: outcome.liked && outcome.matched,
            show_heart: outcome.liked,
        }
    }

    pub fn begin_superlike(&mut self) -> bool {
        !std::mem::replace(&mut self.superlike_pending, true)
    }

    /// A superlike always leaves the card liked and closes the info panel
    pub fn finish_superlike(&mut self, outcome: Option<LikeOutcome>) -> LikeResult {
        self.superlike_pending = false;
        let Some(outcome) = outcome else {
            return LikeResult {
                liked: self.liked,
                ..LikeResult::default()
            };
        };

        self.liked = true;
        self.info_open = false;
        LikeResult {
            liked: true,
            show_match: outcome.matched,
            show_heart: true,
        }
    }
}
