//! Date helper functions
//!
//! Post timestamps stay raw in the view model; these are the only places
//! where they are turned into display strings.

use chrono::{DateTime, Locale, Utc};

/// Format a UTC timestamp in a time zone and locale
///
/// Unknown locales fall back to `en_US`, unknown time zones to UTC.
///
/// # Examples
/// ```ignore
/// format_date_localized(&date, "DD MMM YYYY", "pt_BR", "America/Sao_Paulo") // -> "25 mar 2021"
/// ```
pub fn format_date_localized(date: &DateTime<Utc>, format: &str, locale: &str, tz: &str) -> String {
    let chrono_format = moment_to_chrono_format(format);
    let local = date.with_timezone(&parse_tz(tz));
    local
        .format_localized(&chrono_format, parse_locale(locale))
        .to_string()
}

/// Resolve a locale name such as `pt_BR` or `pt-BR`
pub fn parse_locale(name: &str) -> Locale {
    let normalized = name.replace('-', "_");
    Locale::try_from(normalized.as_str()).unwrap_or_else(|_| {
        tracing::warn!(locale = name, "Unknown locale, using en_US");
        Locale::en_US
    })
}

/// Resolve an IANA time zone name
pub fn parse_tz(name: &str) -> chrono_tz::Tz {
    if name.is_empty() {
        return chrono_tz::UTC;
    }
    name.parse().unwrap_or_else(|_| {
        tracing::warn!(timezone = name, "Unknown time zone, using UTC");
        chrono_tz::UTC
    })
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each category
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month
        ("DDDD", "%j"),
        ("DD", "%d"),
        // Hour 24h
        ("HH", "%H"),
        // Hour 12h
        ("hh", "%I"),
        // Minute
        ("mm", "%M"),
        // Second
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
        // Timezone
        ("ZZ", "%z"),
        // Milliseconds
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
