//! Swipe navigation over a [`FeedBuffer`].
//!
//! Besides moving the cursor, the feed shows two interstitial screens: one
//! after the last recommendation-ranked card and one at the very end of the
//! feed. Swipes are ignored while the current card's info panel is expanded.

use matchfeed_types::UserId;
use serde::Serialize;

use crate::buffer::{Direction, FeedBuffer};
use crate::gesture::Swipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Card,
    /// "You've seen everyone we recommend", shown once per crossing
    RecommendationEnd,
    /// Cursor at the tail and the feed has no more pages
    EndOfFeed,
}

/// Side effects the caller performs after a swipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "value", rename_all = "snake_case")]
pub enum NavEffect {
    /// A card became current: send the view mutation
    RecordView(UserId),
    /// Warm the image cache for the card after the current one
    Prefetch(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct FeedNavigator {
    screen: Screen,
    expanded: bool,
}

impl FeedNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Info panel of the current card opened or closed
    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn on_swipe(&mut self, buffer: &mut FeedBuffer, swipe: Swipe) -> Vec<NavEffect> {
        if buffer.is_empty() || self.expanded {
            return Vec::new();
        }

        match swipe {
            Swipe::Down => self.swipe_down(buffer),
            Swipe::Up => self.swipe_up(buffer),
        }
    }

    fn swipe_down(&mut self, buffer: &mut FeedBuffer) -> Vec<NavEffect> {
        match self.screen {
            Screen::EndOfFeed | Screen::RecommendationEnd => {
                self.screen = Screen::Card;
                Vec::new()
            }
            Screen::Card => self.step(buffer, Direction::Backward),
        }
    }

    fn swipe_up(&mut self, buffer: &mut FeedBuffer) -> Vec<NavEffect> {
        let index = buffer.current_index();
        let has_next = index + 1 < buffer.len();

        match self.screen {
            Screen::EndOfFeed => Vec::new(),
            Screen::RecommendationEnd => {
                self.screen = Screen::Card;
                self.step(buffer, Direction::Forward)
            }
            Screen::Card => {
                let recommended = buffer.recommended_count().unwrap_or(0);
                if recommended > 0 && index + 1 == recommended && has_next {
                    self.screen = Screen::RecommendationEnd;
                    Vec::new()
                } else if has_next {
                    self.step(buffer, Direction::Forward)
                } else {
                    if !buffer.has_more() {
                        self.screen = Screen::EndOfFeed;
                    }
                    Vec::new()
                }
            }
        }
    }

    fn step(&mut self, buffer: &mut FeedBuffer, direction: Direction) -> Vec<NavEffect> {
        if !buffer.advance(direction) {
            return Vec::new();
        }

        let mut effects = Vec::with_capacity(2);
        if let Some(card) = buffer.current() {
            effects.push(NavEffect::RecordView(card.user_id.clone()));
        }
        effects.extend(Self::prefetch(buffer));
        effects
    }

    /// Photos of the card after the cursor, if it is buffered and has any
    pub fn prefetch(buffer: &FeedBuffer) -> Option<NavEffect> {
        buffer
            .peek_next()
            .filter(|card| !card.photos.is_empty())
            .map(|card| NavEffect::Prefetch(card.photos.clone()))
    }
}
