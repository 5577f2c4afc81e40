//! Wall-clock helpers. All interval math runs on minutes since midnight.

/// Parses `H:MM` or `HH:MM` (24h). Returns `None` for anything else.
pub fn time_to_minutes(s: &str) -> Option<u32> {
    let (hours, minutes) = s.split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hours.parse().ok()?;
    let minute: u32 = minutes.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

/// Inverse of [`time_to_minutes`], always zero-padded.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn is_valid_time(s: &str) -> bool {
    time_to_minutes(s).is_some()
}

/// Canonical `HH:MM` form, e.g. `9:05` becomes `09:05`.
pub fn normalize_time(s: &str) -> Option<String> {
    time_to_minutes(s).map(minutes_to_time)
}

/// Half-open intervals `[start, end)` overlap iff each starts before the other ends.
pub fn overlaps(start_a: u32, end_a: u32, start_b: u32, end_b: u32) -> bool {
    start_a < end_b && start_b < end_a
}

/// [`overlaps`] over `HH:MM` strings. Unparseable input never overlaps.
pub fn times_overlap(start_a: &str, end_a: &str, start_b: &str, end_b: &str) -> bool {
    match (
        time_to_minutes(start_a),
        time_to_minutes(end_a),
        time_to_minutes(start_b),
        time_to_minutes(end_b),
    ) {
        (Some(sa), Some(ea), Some(sb), Some(eb)) => overlaps(sa, ea, sb, eb),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("00:00"), Some(0));
        assert_eq!(time_to_minutes("08:00"), Some(480));
        assert_eq!(time_to_minutes("9:30"), Some(570));
        assert_eq!(time_to_minutes("23:59"), Some(1439));
    }

    #[test]
    fn test_time_to_minutes_rejects_malformed() {
        for bad in ["", "24:00", "12:60", "12:5", "123:00", "ab:cd", "12", "12:00:00", "-1:00", "+9:00"] {
            assert_eq!(time_to_minutes(bad), None, "{bad} should be rejected");
        }
    }

    #[test]
    fn test_minutes_to_time_pads() {
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(545), "09:05");
        assert_eq!(minutes_to_time(1080), "18:00");
    }

    #[test]
    fn test_every_canonical_time_round_trips() {
        for minutes in 0..24 * 60 {
            let t = minutes_to_time(minutes);
            assert_eq!(time_to_minutes(&t), Some(minutes));
            assert_eq!(minutes_to_time(time_to_minutes(&t).unwrap()), t);
        }
    }

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time("0:00"));
        assert!(is_valid_time("17:45"));
        assert!(!is_valid_time("17:45 "));
        assert!(!is_valid_time("1745"));
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("9:05").as_deref(), Some("09:05"));
        assert_eq!(normalize_time("17:30").as_deref(), Some("17:30"));
        assert_eq!(normalize_time("7pm"), None);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let points = [480, 510, 540, 570, 600];
        for &a in &points {
            for &b in &points {
                for &c in &points {
                    for &d in &points {
                        assert_eq!(overlaps(a, b, c, d), overlaps(c, d, a, b));
                    }
                }
            }
        }
    }

    #[test]
    fn test_back_to_back_does_not_overlap() {
        assert!(!overlaps(8 * 60, 9 * 60, 9 * 60, 10 * 60));
        assert!(!overlaps(9 * 60, 10 * 60, 8 * 60, 9 * 60));
    }

    #[test]
    fn test_partial_and_contained_overlap() {
        assert!(overlaps(600, 630, 615, 645));
        assert!(overlaps(600, 720, 630, 660));
        assert!(overlaps(630, 660, 600, 720));
    }

    #[test]
    fn test_times_overlap_strings() {
        assert!(times_overlap("10:00", "10:30", "10:15", "10:45"));
        assert!(!times_overlap("10:00", "10:30", "10:30", "11:00"));
        assert!(!times_overlap("bogus", "10:30", "10:00", "11:00"));
    }
}
