//! Display formatting shared by the screens.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Walking pace used for time estimates, in metres per minute
pub const WALKING_METRES_PER_MINUTE: u32 = 80;

/// Minutes on foot for `distance_m`, rounded up
#[must_use]
pub const fn walking_minutes(distance_m: u32) -> u32 {
    distance_m.div_ceil(WALKING_METRES_PER_MINUTE)
}

/// `380` → `"380m"`, `1200` → `"1.2km"`
#[must_use]
pub fn format_distance(distance_m: u32) -> String {
    if distance_m >= 1000 {
        format!("{:.1}km", f64::from(distance_m) / 1000.0)
    } else {
        format!("{distance_m}m")
    }
}

/// `14000` → `"14,000원"`
#[must_use]
pub fn format_won(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}원")
}

/// Hide the middle block of a phone number.
///
/// Accepts `010-1234-5678` and `01012345678`; anything else is returned as is.
#[must_use]
pub fn mask_phone(phone: &str) -> String {
    let parts: Vec<&str> = phone.split('-').collect();
    if let [head, _, tail] = parts.as_slice() {
        return format!("{head}-****-{tail}");
    }
    if phone.len() == 11 && phone.is_ascii() {
        return format!("{}-****-{}", &phone[..3], &phone[7..]);
    }
    phone.to_string()
}

/// `YYYY.MM.DD HH:MM`
#[must_use]
pub fn format_datetime<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%Y.%m.%d %H:%M").to_string()
}

/// `H:MM`, as on the waiting and in-use screens
#[must_use]
pub fn format_clock<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%-H:%M").to_string()
}

/// `"1시간 5분"` once an hour has passed, otherwise `"45분"`
#[must_use]
pub fn elapsed_label(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let (hours, rest) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}시간 {rest}분")
    } else {
        format!("{rest}분")
    }
}

/// `"2시간"`, `"1시간 30분"` or `"45분"` for a fixed length of time
#[must_use]
pub fn duration_label(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, rest) => format!("{rest}분"),
        (hours, 0) => format!("{hours}시간"),
        (hours, rest) => format!("{hours}시간 {rest}분"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn walking_time_rounds_up() {
        assert_eq!(walking_minutes(0), 0);
        assert_eq!(walking_minutes(80), 1);
        assert_eq!(walking_minutes(120), 2);
        assert_eq!(walking_minutes(850), 11);
    }

    #[test]
    fn distances() {
        assert_eq!(format_distance(380), "380m");
        assert_eq!(format_distance(999), "999m");
        assert_eq!(format_distance(1000), "1.0km");
        assert_eq!(format_distance(1200), "1.2km");
    }

    #[test]
    fn won_amounts() {
        assert_eq!(format_won(0), "0원");
        assert_eq!(format_won(4500), "4,500원");
        assert_eq!(format_won(14000), "14,000원");
        assert_eq!(format_won(1_234_567), "1,234,567원");
    }

    #[test]
    fn phone_masking() {
        assert_eq!(mask_phone("010-1234-5678"), "010-****-5678");
        assert_eq!(mask_phone("01012345678"), "010-****-5678");
        assert_eq!(mask_phone("0101234"), "0101234");
    }

    #[test]
    fn dates() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_datetime(&at), "2025.03.07 09:05");
        assert_eq!(format_clock(&at), "9:05");
    }

    #[test]
    fn elapsed() {
        assert_eq!(elapsed_label(45), "45분");
        assert_eq!(elapsed_label(60), "1시간 0분");
        assert_eq!(elapsed_label(125), "2시간 5분");
        assert_eq!(elapsed_label(-3), "0분");
    }

    #[test]
    fn durations_drop_zero_minutes() {
        assert_eq!(duration_label(120), "2시간");
        assert_eq!(duration_label(90), "1시간 30분");
        assert_eq!(duration_label(45), "45분");
    }
}
