//! Relative "last seen" formatting for the offline player list

use std::fmt::Display;

use chrono::{DateTime, Days, Local, TimeZone, Utc};

use crate::i18n::Translations;
use crate::types::parse_timestamp;

/// Describe how long ago `raw` was, relative to `now`.
///
/// Calendar days and clock times are those of the local time zone, the same
/// one the history chart labels its axis in. Unparseable or missing
/// timestamps render as an empty string.
pub fn format_last_seen(raw: Option<&str>, now: DateTime<Utc>, t: &Translations) -> String {
    format_last_seen_in(raw, now, &Local, t)
}

/// [`format_last_seen`] with an explicit time zone.
pub fn format_last_seen_in<Tz>(
    raw: Option<&str>,
    now: DateTime<Utc>,
    tz: &Tz,
    t: &Translations,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(then) = raw.and_then(parse_timestamp) else {
        return String::new();
    };

    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return t.get("time.just_now", "just now").to_string();
    }
    if seconds < 3600 {
        let minutes = (seconds / 60).to_string();
        return t.format("time.minutes_ago", "{n} min ago", &[("n", &minutes)]);
    }
    if seconds < 86_400 {
        let hours = (seconds / 3600).to_string();
        return t.format("time.hours_ago", "{n}h ago", &[("n", &hours)]);
    }

    let then = then.with_timezone(tz);
    let today = now.with_timezone(tz).date_naive();
    let time = then.format("%H:%M").to_string();
    if then.date_naive() == today {
        return t.format("time.today_at", "today at {time}", &[("time", &time)]);
    }
    if Some(then.date_naive()) == today.checked_sub_days(Days::new(1)) {
        return t.format("time.yesterday_at", "yesterday at {time}", &[("time", &time)]);
    }
    then.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn ago(seconds: i64) -> String {
        (now() - chrono::Duration::seconds(seconds)).to_rfc3339()
    }

    #[test]
    fn test_buckets() {
        let t = Translations::default();
        assert_eq!(format_last_seen(Some(&ago(30)), now(), &t), "just now");
        assert_eq!(format_last_seen(Some(&ago(125)), now(), &t), "2 min ago");
        assert_eq!(format_last_seen(Some(&ago(3 * 3600 + 5)), now(), &t), "3h ago");
    }

    #[test]
    fn test_yesterday_and_older() {
        let t = Translations::default();
        assert_eq!(
            format_last_seen_in(Some("2024-06-09T08:15:00+00:00"), now(), &Utc, &t),
            "yesterday at 08:15"
        );
        assert_eq!(
            format_last_seen_in(Some("2024-05-01T08:15:00+00:00"), now(), &Utc, &t),
            "01/05/2024"
        );
    }

    #[test]
    fn test_day_split_follows_time_zone() {
        let t = Translations::default();
        let raw = Some("2024-06-09T02:00:00+00:00");
        assert_eq!(format_last_seen_in(raw, now(), &Utc, &t), "yesterday at 02:00");

        // UTC-3: seen 08/06 at 23:00, while "now" is 10/06 09:00
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(format_last_seen_in(raw, now(), &brt, &t), "08/06/2024");

        // UTC+9: seen 09/06 at 11:00, while "now" is 10/06 21:00
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_last_seen_in(raw, now(), &jst, &t), "yesterday at 11:00");
    }

    #[test]
    fn test_missing_or_invalid() {
        let t = Translations::default();
        assert_eq!(format_last_seen(None, now(), &t), "");
        assert_eq!(format_last_seen(Some("never"), now(), &t), "");
    }

    #[test]
    fn test_translated() {
        let t = Translations::builtin("pt-BR");
        assert_eq!(format_last_seen(Some(&ago(10)), now(), &t), "agora mesmo");
        assert_eq!(format_last_seen(Some(&ago(600)), now(), &t), "há 10 min");
    }
}
