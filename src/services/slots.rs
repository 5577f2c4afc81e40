use crate::models::SlotCandidate;
use crate::services::time::minutes_to_time;

pub const BUSINESS_OPEN_HOUR: u32 = 8;
pub const BUSINESS_CLOSE_HOUR: u32 = 18;
pub const BUSINESS_OPEN_MINUTES: u32 = BUSINESS_OPEN_HOUR * 60;
pub const BUSINESS_CLOSE_MINUTES: u32 = BUSINESS_CLOSE_HOUR * 60;
pub const SLOT_INTERVAL_MINUTES: u32 = 30;

/// Every grid start between opening and closing paired with its end time.
///
/// A candidate is kept only while the hour of its end stays below closing, so
/// a slot may not end at 18:00 or later. Output is ascending by start time.
pub fn generate_slots(service_duration_minutes: u32) -> Vec<SlotCandidate> {
    let mut slots = Vec::new();

    for hour in BUSINESS_OPEN_HOUR..BUSINESS_CLOSE_HOUR {
        for minute in (0..60).step_by(SLOT_INTERVAL_MINUTES as usize) {
            let start = hour * 60 + minute;
            let Some(end) = start.checked_add(service_duration_minutes) else {
                continue;
            };
            if end / 60 < BUSINESS_CLOSE_HOUR {
                slots.push(SlotCandidate {
                    start_time: minutes_to_time(start),
                    end_time: minutes_to_time(end),
                });
            }
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::time::time_to_minutes;

    #[test]
    fn test_thirty_minute_grid() {
        let slots = generate_slots(30);
        assert_eq!(slots.first().unwrap().start_time, "08:00");
        assert_eq!(slots.first().unwrap().end_time, "08:30");
        assert_eq!(slots.last().unwrap().start_time, "17:00");
        assert_eq!(slots.last().unwrap().end_time, "17:30");
        assert_eq!(slots.len(), 19);
    }

    #[test]
    fn test_starts_stay_on_grid_within_hours() {
        for slot in generate_slots(45) {
            let start = time_to_minutes(&slot.start_time).unwrap();
            assert_eq!(start % SLOT_INTERVAL_MINUTES, 0);
            assert!(start >= BUSINESS_OPEN_MINUTES);
            assert!(start <= 17 * 60 + 30);
        }
    }

    #[test]
    fn test_no_slot_ends_in_closing_hour_or_later() {
        for duration in [15, 30, 45, 60, 90, 120, 240] {
            for slot in generate_slots(duration) {
                let end = time_to_minutes(&slot.end_time).unwrap();
                assert!(end / 60 < BUSINESS_CLOSE_HOUR, "{duration}: {slot:?}");
                assert!(end <= BUSINESS_CLOSE_MINUTES);
            }
        }
    }

    #[test]
    fn test_ascending_order() {
        let slots = generate_slots(60);
        let starts: Vec<u32> = slots
            .iter()
            .map(|s| time_to_minutes(&s.start_time).unwrap())
            .collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_fifteen_minute_service_keeps_last_half_hour() {
        let slots = generate_slots(15);
        let last = slots.last().unwrap();
        assert_eq!(last.start_time, "17:30");
        assert_eq!(last.end_time, "17:45");
        assert_eq!(slots.len(), 20);
    }

    #[test]
    fn test_duration_longer_than_day_yields_nothing() {
        assert!(generate_slots(10 * 60).is_empty());
    }

    #[test]
    fn test_huge_duration_does_not_wrap() {
        assert!(generate_slots(u32::MAX).is_empty());
        assert!(generate_slots(u32::MAX - BUSINESS_OPEN_MINUTES).is_empty());
    }
}
