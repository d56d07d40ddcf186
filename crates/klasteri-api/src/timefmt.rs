//! Recency formatting for article timestamps.
//!
//! Backend timestamps are ISO-ish and sometimes carry a trailing `Z` even
//! though the product treats them as local time, so parsing strips a zone
//! marker and stays naive. `now` is always an explicit parameter.

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Articles younger than this get the recency highlight, a stronger signal
/// than the plain "tani" label.
pub const RECENT_WINDOW_SECS: i64 = 18 * 60;

const MONTHS_SQ: [&str; 12] = [
    "jan", "shk", "mar", "pri", "maj", "qer", "kor", "gush", "sht", "tet", "nën", "dhj",
];

/// Parse an API timestamp, ignoring any trailing `Z`.
pub fn parse_naive(ts: &str) -> Option<NaiveDateTime> {
    let s = ts.trim().trim_end_matches(['Z', 'z']);
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Elapsed-time label: "tani", "N min", "N orë", "N ditë", then a calendar
/// date ("23 gush"). A future timestamp clamps to "tani" instead of going
/// negative.
pub fn time_ago(ts: &str, now: NaiveDateTime) -> String {
    let Some(date) = parse_naive(ts) else {
        return String::new();
    };
    let seconds = (now - date).num_seconds().max(0);

    if seconds < 60 {
        return "tani".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} orë", hours);
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{} ditë", days);
    }
    format!("{} {}", date.day(), MONTHS_SQ[date.month0() as usize])
}

/// Recency flag for visual emphasis: published within the last 18 minutes.
pub fn is_recent(ts: &str, now: NaiveDateTime) -> bool {
    match parse_naive(ts) {
        Some(date) => (now - date).num_seconds() < RECENT_WINDOW_SECS,
        None => false,
    }
}

/// Clock-time label for the tonight rail: "HH:MM", prefixed with "Dje" when
/// the timestamp is not from today.
pub fn clock_time(ts: &str, now: NaiveDateTime) -> String {
    let Some(date) = parse_naive(ts) else {
        return String::new();
    };
    let time = format!("{:02}:{:02}", date.hour(), date.minute());
    if date.date() == now.date() {
        time
    } else {
        format!("Dje {}", time)
    }
}

/// "m:ss" for the audio player's elapsed/remaining readouts.
pub fn remaining(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Which edition a summary belongs to, by its creation hour: the backend
/// produces editions around 12, 15, 18 and 22 o'clock.
pub fn summary_time_label(created_at: &str, now: NaiveDateTime) -> String {
    let Some(date) = parse_naive(created_at) else {
        return "Përmbledhja e ditës".to_string();
    };
    let display_hour = match date.hour() {
        11..=13 => 12,
        14..=16 => 15,
        17..=20 => 18,
        _ => 22,
    };
    let label = format!("Lajmet e orës {}", display_hour);
    if date.date() == now.date() {
        label
    } else {
        format!("Dje - {}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 23)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    fn ts_ago(d: Duration) -> String {
        (now() - d).format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    #[test]
    fn buckets_match_the_documented_boundaries() {
        let cases = [
            (Duration::seconds(0), "tani"),
            (Duration::seconds(59), "tani"),
            (Duration::seconds(60), "1 min"),
            (Duration::seconds(17 * 60 + 59), "17 min"),
            (Duration::seconds(18 * 60), "18 min"),
            (Duration::seconds(59 * 60 + 59), "59 min"),
            (Duration::minutes(60), "1 orë"),
            (Duration::minutes(23 * 60 + 59), "23 orë"),
            (Duration::hours(24), "1 ditë"),
            (Duration::hours(6 * 24 + 23), "6 ditë"),
        ];
        for (elapsed, expected) in cases {
            assert_eq!(time_ago(&ts_ago(elapsed), now()), expected, "{:?}", elapsed);
        }
        // 7 days falls through to the calendar date
        assert_eq!(time_ago(&ts_ago(Duration::days(7)), now()), "16 gush");
    }

    #[test]
    fn future_timestamp_clamps_to_now_label() {
        let future = (now() + Duration::seconds(5))
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        assert_eq!(time_ago(&future, now()), "tani");
    }

    #[test]
    fn recency_flag_uses_the_18_minute_window() {
        assert!(is_recent(&ts_ago(Duration::seconds(17 * 60 + 59)), now()));
        assert!(!is_recent(&ts_ago(Duration::seconds(18 * 60)), now()));
        assert!(is_recent(&ts_ago(Duration::seconds(-5)), now()));
    }

    #[test]
    fn trailing_z_is_stripped_before_parsing() {
        assert_eq!(time_ago("2026-08-23T19:59:30Z", now()), "tani");
        assert!(parse_naive("2026-08-23T19:59:30.123Z").is_some());
        assert!(parse_naive("not a date").is_none());
        assert_eq!(time_ago("not a date", now()), "");
    }

    #[test]
    fn clock_time_marks_yesterday() {
        assert_eq!(clock_time("2026-08-23T08:05:00Z", now()), "08:05");
        assert_eq!(clock_time("2026-08-22T23:40:00Z", now()), "Dje 23:40");
    }

    #[test]
    fn remaining_formats_m_ss() {
        assert_eq!(remaining(0.0), "0:00");
        assert_eq!(remaining(65.9), "1:05");
        assert_eq!(remaining(-3.0), "0:00");
    }

    #[test]
    fn summary_label_buckets_by_creation_hour() {
        assert_eq!(summary_time_label("2026-08-23T12:10:00Z", now()), "Lajmet e orës 12");
        assert_eq!(summary_time_label("2026-08-23T15:30:00Z", now()), "Lajmet e orës 15");
        assert_eq!(summary_time_label("2026-08-23T18:01:00Z", now()), "Lajmet e orës 18");
        assert_eq!(summary_time_label("2026-08-23T22:05:00Z", now()), "Lajmet e orës 22");
        assert_eq!(
            summary_time_label("2026-08-22T22:05:00Z", now()),
            "Dje - Lajmet e orës 22"
        );
    }
}
