// Engine module - synchronous feed state machines
// Sits between the data model (types) and the async session/CLI layers.
// Nothing here performs I/O: operations return requests and effects that
// the caller executes.

pub mod buffer;
pub mod card;
pub mod gesture;
pub mod navigator;
pub mod time_ago;
pub mod username;

pub use buffer::{
    BufferConfig, BufferSnapshot, Direction, FeedBuffer, IngestReport, Ingestion, PageRequest,
};
pub use card::{CardView, LikeResult, PhotoStep, TapAction};
pub use gesture::{Swipe, Tap, TapDetector, DOUBLE_TAP_DELAY_MS, SWIPE_THRESHOLD_RATIO};
pub use navigator::{FeedNavigator, NavEffect, Screen};
pub use time_ago::time_ago;
pub use username::{contains_banned_word, is_valid_username_format};
