use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

const SHORT_MONTHS: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.", "нояб.",
    "дек.",
];

/// Relative Russian timestamp for activity lists ("5 мин назад", "вчера").
///
/// Anything four weeks or older is shown as a short calendar date. Times in
/// the future count as "just now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "только что".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} мин назад", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} ч назад", hours);
    }

    let days = hours / 24;
    if days == 1 {
        return "вчера".to_string();
    }
    if days < 7 {
        return format!("{} дн назад", days);
    }

    let weeks = days / 7;
    if weeks < 4 {
        return format!("{} нед назад", weeks);
    }

    format!("{} {}", then.day(), SHORT_MONTHS[then.month0() as usize])
}

/// Parse a backend timestamp. RFC 3339 and zone-less ISO forms are accepted;
/// the latter are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
