//! Testing infrastructure for matchfeed integration tests.
//!
//! - `fixtures`: card/page builders and on-disk recordings
//! - `sources`: scripted and slicing `FeedSource` implementations

pub mod fixtures;
pub mod sources;

pub use fixtures::{card, cards, page, write_recording};
pub use sources::{ScriptedSource, SliceSource, Step};
