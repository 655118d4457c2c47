use serde::{Deserialize, Serialize};
use std::fmt;

/// Mood tag a user can pin to their profile.
///
/// Wire values are the backend's lowercase slugs; the empty string means
/// "no status", as does `null`. Unrecognised slugs fall back to [`StatusTag::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum StatusTag {
    #[default]
    None,
    Walking,
    Evening,
    Fashion,
    Sport,
    Chill,
    Party,
}

impl StatusTag {
    pub fn all() -> &'static [StatusTag] {
        &[
            StatusTag::None,
            StatusTag::Walking,
            StatusTag::Evening,
            StatusTag::Fashion,
            StatusTag::Sport,
            StatusTag::Chill,
            StatusTag::Party,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            StatusTag::None => "",
            StatusTag::Walking => "walking",
            StatusTag::Evening => "evening",
            StatusTag::Fashion => "fashion",
            StatusTag::Sport => "sport",
            StatusTag::Chill => "chill",
            StatusTag::Party => "party",
        }
    }

    pub fn from_slug(slug: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|tag| tag.slug() == slug)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusTag::None => "Без статуса",
            StatusTag::Walking => "Гуляю",
            StatusTag::Evening => "На вечер",
            StatusTag::Fashion => "Fashion",
            StatusTag::Sport => "Спорт",
            StatusTag::Chill => "Отдыхаю",
            StatusTag::Party => "Тусовка",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            StatusTag::None => "",
            StatusTag::Walking => "🚶",
            StatusTag::Evening => "🌙",
            StatusTag::Fashion => "👗",
            StatusTag::Sport => "⚽",
            StatusTag::Chill => "😎",
            StatusTag::Party => "🎉",
        }
    }

    /// Badge text shown on a card: `"<emoji> <name>"`, empty for no status.
    pub fn label(&self) -> String {
        match self {
            StatusTag::None => String::new(),
            tag => format!("{} {}", tag.emoji(), tag.name()),
        }
    }
}

impl From<Option<String>> for StatusTag {
    fn from(s: Option<String>) -> Self {
        s.map(|slug| Self::from_slug(&slug)).unwrap_or_default()
    }
}

impl From<StatusTag> for String {
    fn from(tag: StatusTag) -> Self {
        tag.slug().to_string()
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
