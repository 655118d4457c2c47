//! Sample data generation.

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::Result;
use matchfeed_runtime::source::Recording;
use matchfeed_types::{Card, FeedPage, StatusTag};

/// Card `u{n}` with one photo and a name, enough for display code paths.
///
/// # Example
/// ```
/// let c = matchfeed_testing::card(7);
/// assert_eq!(c.user_id.as_str(), "u7");
/// ```
pub fn card(n: usize) -> Card {
    let mut card = Card::new(format!("u{}", n));
    card.name = format!("User {}", n);
    card.city = "Минск".to_string();
    card.photos = vec![format!("https://cdn.example/u{}/0.jpg", n)];
    card.status = if n % 2 == 0 {
        StatusTag::Walking
    } else {
        StatusTag::None
    };
    card
}

pub fn cards(ids: Range<usize>) -> Vec<Card> {
    ids.map(card).collect()
}

pub fn page(ids: Range<usize>, recommended_count: usize) -> FeedPage {
    FeedPage::new(cards(ids), recommended_count)
}

/// Write pages as a replay recording (`{"pages": [...]}`) and return its path
pub fn write_recording(dir: &Path, name: &str, pages: Vec<FeedPage>) -> Result<PathBuf> {
    let path = dir.join(name);
    let content = serde_json::to_string_pretty(&Recording { pages })?;
    std::fs::write(&path, content)?;
    Ok(path)
}
