use once_cell::sync::Lazy;
use time::{
    format_description::{self, well_known::Rfc3339, FormatItem},
    Date, OffsetDateTime, PrimitiveDateTime,
};

// Naive date-time layouts, interpreted as UTC.
static DATE_TIME_FORMATS: Lazy<Vec<Vec<FormatItem<'static>>>> = Lazy::new(|| {
    [
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
        "[year]-[month]-[day]T[hour]:[minute]:[second]",
        "[year]-[month]-[day] [hour]:[minute]:[second]",
        "[year]-[month]-[day]T[hour]:[minute]",
    ]
    .into_iter()
    .map(|format| format_description::parse(format).expect("Shouldn't happen"))
    .collect()
});

static DATE_FORMAT: Lazy<Vec<FormatItem<'static>>> =
    Lazy::new(|| format_description::parse("[year]-[month]-[day]").expect("Shouldn't happen"));

/// Parse an ISO-like date string into an instant.
///
/// Accepts RFC 3339, a naive date-time (UTC assumed) or a plain
/// `YYYY-MM-DD` date (midnight UTC). Returns `None` for anything else.
pub fn parse_date(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if let Ok(instant) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(instant);
    }

    if let Some(date_time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(value, format.as_slice()).ok())
    {
        return Some(date_time.assume_utc());
    }

    Date::parse(value, DATE_FORMAT.as_slice())
        .ok()
        .map(|date| date.midnight().assume_utc())
}
