use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Score returned when the creation time is missing or unparsable.
pub const NEUTRAL_RECENCY: f64 = 0.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Computes freshness with linear decay across `window_days`.
/// Future-dated blocks score 1.0, blocks older than the window score 0.0.
/// Never fails: bad input falls back to [`NEUTRAL_RECENCY`].
pub fn compute_recency_score(
    created_at: Option<&str>,
    window_days: u32,
    now: DateTime<Utc>,
) -> f64 {
    let created = match created_at.and_then(parse_timestamp) {
        Some(t) => t,
        None => return NEUTRAL_RECENCY,
    };

    let age_days = (now - created).num_milliseconds() as f64 / MILLIS_PER_DAY;
    if age_days < 0.0 {
        return 1.0;
    }

    let window = f64::from(window_days);
    if age_days > window {
        return 0.0;
    }
    if window == 0.0 {
        // zero-width window and zero age
        return 1.0;
    }

    (1.0 - age_days / window).clamp(0.0, 1.0)
}

/// Offset-bearing forms not covered by RFC 3339 (no seconds, colon-less offset).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Zone-less forms, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses the ISO-8601 forms callers send: RFC 3339, offsets with or without
/// a colon, minute precision, zone-less datetimes (read as UTC) and the
/// reduced dates `YYYY-MM-DD`, `YYYY-MM` and `YYYY` (first day, midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(t) = DateTime::parse_from_str(raw, format) {
            return Some(t.with_timezone(&Utc));
        }
    }

    // A trailing `Z` is UTC, which is how zone-less input is read anyway.
    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    for format in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(t.and_utc());
        }
    }

    parse_calendar_date(naive)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Some(d);
    }
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn iso(t: DateTime<Utc>) -> String {
        t.to_rfc3339()
    }

    #[test]
    fn test_missing_timestamp_is_neutral() {
        assert_eq!(compute_recency_score(None, 365, fixed_now()), 0.5);
    }

    #[test]
    fn test_unparsable_timestamp_is_neutral() {
        assert_eq!(
            compute_recency_score(Some("last spring"), 365, fixed_now()),
            0.5
        );
    }

    #[test]
    fn test_created_now_is_one() {
        let now = fixed_now();
        assert_eq!(compute_recency_score(Some(&iso(now)), 365, now), 1.0);
    }

    #[test]
    fn test_future_dated_is_one() {
        let now = fixed_now();
        let future = iso(now + Duration::days(30));
        assert_eq!(compute_recency_score(Some(&future), 365, now), 1.0);
    }

    #[test]
    fn test_older_than_window_is_zero() {
        let now = fixed_now();
        let old = iso(now - Duration::days(365) - Duration::days(1));
        assert_eq!(compute_recency_score(Some(&old), 365, now), 0.0);
    }

    #[test]
    fn test_linear_decay_midpoint() {
        let now = fixed_now();
        let half = iso(now - Duration::days(50));
        let score = compute_recency_score(Some(&half), 100, now);
        assert!((score - 0.5).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_zero_window() {
        let now = fixed_now();
        assert_eq!(compute_recency_score(Some(&iso(now)), 0, now), 1.0);
        let yesterday = iso(now - Duration::days(1));
        assert_eq!(compute_recency_score(Some(&yesterday), 0, now), 0.0);
    }

    #[test]
    fn test_parses_date_only_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-04"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-04T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-04T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("04/03/2025"), None);
    }

    #[test]
    fn test_parses_reduced_precision_and_offset_forms() {
        let noon = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2026-06-01T12:00Z"), Some(noon));
        assert_eq!(parse_timestamp("2026-06-01T12:00"), Some(noon));
        assert_eq!(parse_timestamp("2026-06-01T12:00:00Z"), Some(noon));
        assert_eq!(parse_timestamp("2026-06-01T12:00:00+0000"), Some(noon));
        assert_eq!(parse_timestamp("2026-06-01T14:00+0200"), Some(noon));
        assert_eq!(parse_timestamp("2026-06-01T12:00:00.000Z"), Some(noon));

        let june = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2026-06"), Some(june));
        let new_year = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2026"), Some(new_year));

        assert_eq!(parse_timestamp("2026-13"), None);
        assert_eq!(parse_timestamp("26"), None);
    }

    #[test]
    fn test_reduced_forms_created_now_keep_full_recency() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        for raw in [
            "2026-06-01T12:00Z",
            "2026-06-01T12:00",
            "2026-06-01T12:00:00+0000",
        ] {
            assert_eq!(compute_recency_score(Some(raw), 365, now), 1.0, "{raw}");
        }
        // month precision resolves to the first of the month, inside the window
        let month = compute_recency_score(Some("2026-06"), 365, now);
        assert!(month > 0.99, "Score was {month}");
    }
}
