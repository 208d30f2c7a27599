use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;

/// Zone that defines the calendar day for due dates and the 1:1 cadence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Default for AppTimezone {
    fn default() -> Self {
        AppTimezone::Named(Tz::UTC)
    }
}

fn parse_fixed_offset(raw: &str) -> Option<FixedOffset> {
    let trimmed = raw.trim();
    let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (1, rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (-1, rest.trim())
    } else {
        return None;
    };
    if rest.is_empty() {
        return None;
    }

    let (hours, minutes) = if let Some((h, m)) = rest.split_once(':') {
        (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
    } else if rest.len() > 2 && rest.is_char_boundary(rest.len() - 2) {
        let (h, m) = rest.split_at(rest.len() - 2);
        (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
    } else {
        (rest.parse::<i32>().ok()?, 0)
    };

    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Accepts IANA names (`Europe/Kyiv`), `UTC`/`GMT`, and offsets such as
/// `UTC+02:00` or `-0530`.
pub fn parse_timezone(raw: &str) -> Option<AppTimezone> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("gmt") {
        return Some(AppTimezone::Named(Tz::UTC));
    }

    let upper = trimmed.to_ascii_uppercase();
    if let Some(offset) = upper.strip_prefix("UTC").or_else(|| upper.strip_prefix("GMT")) {
        return parse_fixed_offset(offset).map(AppTimezone::Fixed);
    }
    if trimmed.starts_with('+') || trimmed.starts_with('-') {
        return parse_fixed_offset(trimmed).map(AppTimezone::Fixed);
    }

    let named = if trimmed == "Europe/Kiev" { "Europe/Kyiv" } else { trimmed };
    named.parse::<Tz>().ok().map(AppTimezone::Named)
}

/// Calendar date of `now` in `tz`.
pub fn local_date(tz: AppTimezone, now: DateTime<Utc>) -> NaiveDate {
    match tz {
        AppTimezone::Named(tz) => now.with_timezone(&tz).date_naive(),
        AppTimezone::Fixed(offset) => now.with_timezone(&offset).date_naive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timezone_forms() {
        assert_eq!(parse_timezone("utc"), Some(AppTimezone::Named(Tz::UTC)));
        assert_eq!(
            parse_timezone("UTC+02:00"),
            FixedOffset::east_opt(7200).map(AppTimezone::Fixed)
        );
        assert_eq!(
            parse_timezone("-0530"),
            FixedOffset::west_opt(5 * 3600 + 1800).map(AppTimezone::Fixed)
        );
        assert_eq!(
            parse_timezone("Europe/Kiev"),
            Some(AppTimezone::Named(chrono_tz::Europe::Kyiv))
        );
        assert_eq!(parse_timezone("Mars/Olympus"), None);
        assert_eq!(parse_timezone("+15"), None);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 22, 30, 0).unwrap();
        let kyiv = parse_timezone("Europe/Kyiv").unwrap();
        assert_eq!(local_date(kyiv, now), NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        assert_eq!(
            local_date(AppTimezone::default(), now),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
    }
}
