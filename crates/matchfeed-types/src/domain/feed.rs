use serde::{Deserialize, Serialize};

use super::card::Card;

/// One page returned by the paged feed endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub users: Vec<Card>,

    /// Length of the recommendation-ranked prefix of the whole feed
    #[serde(default, rename = "recommendedCount", alias = "recommended_count")]
    pub recommended_count: usize,
}

impl FeedPage {
    pub fn new(users: Vec<Card>, recommended_count: usize) -> Self {
        Self {
            users,
            recommended_count,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Result of a like or superlike mutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    /// New liked state (a second like toggles it off)
    pub liked: bool,

    /// Both sides liked each other
    #[serde(default)]
    pub matched: bool,
}

/// Daily superlike allowance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperlikeStatus {
    pub used: u32,
    pub remaining: u32,
}

impl SuperlikeStatus {
    /// Apply a successful superlike; the server reports the new remaining count.
    pub fn consume(&mut self, remaining: Option<u32>) {
        if let Some(remaining) = remaining {
            self.used += 1;
            self.remaining = remaining;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_recommended_count() {
        let page: FeedPage = serde_json::from_str(r#"{"users":[{"user_id":"a"}]}"#).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.recommended_count, 0);
    }

    #[test]
    fn test_page_reads_backend_key() {
        let page: FeedPage =
            serde_json::from_str(r#"{"users":[],"recommendedCount":12}"#).unwrap();
        assert_eq!(page.recommended_count, 12);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["recommendedCount"], 12);
    }

    #[test]
    fn test_superlike_consume_ignores_missing_remaining() {
        let mut status = SuperlikeStatus {
            used: 1,
            remaining: 2,
        };
        status.consume(None);
        assert_eq!(status.used, 1);

        status.consume(Some(1));
        assert_eq!(status, SuperlikeStatus { used: 2, remaining: 1 });
    }
}
