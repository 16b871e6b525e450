use chrono::{DateTime, Utc};

pub use quiz_core::time::format_elapsed;

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

#[must_use]
pub fn format_optional_date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), format_datetime)
}
