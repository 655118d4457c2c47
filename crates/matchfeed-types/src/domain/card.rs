use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::status::StatusTag;

/// Backend identifier of a profile shown in the feed.
///
/// The feed endpoint has served both numeric and string ids; both forms
/// deserialize into the same string-backed key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawUserId")]
pub struct UserId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(i64),
}

impl From<RawUserId> for UserId {
    fn from(raw: RawUserId) -> Self {
        match raw {
            RawUserId::Text(s) => Self(s),
            RawUserId::Number(n) => Self(n.to_string()),
        }
    }
}

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One candidate profile displayed in the feed.
///
/// Mirrors the feed endpoint's user object. Unknown fields are ignored and
/// optional display attributes default, so older or newer backends still
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub user_id: UserId,

    /// Photo URLs in display order
    #[serde(default)]
    pub photos: Vec<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,

    #[serde(default)]
    pub city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    #[serde(default)]
    pub is_verified: bool,

    #[serde(default)]
    pub status: StatusTag,

    /// Patched in place when a like/superlike succeeds
    #[serde(default)]
    pub is_liked: bool,
}

impl Card {
    /// Minimal card with only an identifier, used by fixtures and replay tools
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            photos: Vec::new(),
            name: String::new(),
            birthdate: None,
            about: None,
            city: String::new(),
            district: None,
            is_verified: false,
            status: StatusTag::None,
            is_liked: false,
        }
    }

    /// Completed years between the birthdate and `today`.
    pub fn age(&self, today: NaiveDate) -> Option<u32> {
        let birthdate = self.birthdate?;
        if birthdate > today {
            return None;
        }

        let mut years = today.year() - birthdate.year();
        if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// "City, District" or just the city
    pub fn place(&self) -> String {
        match &self.district {
            Some(district) if !district.is_empty() => format!("{}, {}", self.city, district),
            _ => self.city.clone(),
        }
    }
}
