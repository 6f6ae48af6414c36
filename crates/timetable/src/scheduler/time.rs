//! Clock-time helpers and fixed-duration slot generation.

use super::types::TimeSlot;

/// Minutes in a day. Times at or past this value are not wrapped.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Converts an `HH:MM` string into minutes since midnight.
///
/// Returns `None` for anything that is not two colon-separated unsigned
/// integers. Range is not checked: `"25:00"` yields 1500.
pub fn time_to_minutes(time: &str) -> Option<u32> {
    let (hours, minutes) = time.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Formats minutes since midnight as a zero-padded `HH:MM` string.
///
/// Values of a day or more overflow the hour field (1500 becomes `"25:00"`).
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Generates back-to-back slots of `duration` minutes starting at `start_time`.
///
/// A slot is emitted for every start strictly before `end_time`, so the last
/// slot may run past the end. Unparseable bounds or a zero duration give an
/// empty sequence.
pub fn generate_time_slots(start_time: &str, end_time: &str, duration: u32) -> Vec<TimeSlot> {
    let (Some(start), Some(end)) = (time_to_minutes(start_time), time_to_minutes(end_time)) else {
        return Vec::new();
    };
    if duration == 0 {
        return Vec::new();
    }

    (start..end)
        .step_by(duration as usize)
        .map(|current| {
            TimeSlot::new(
                minutes_to_time(current),
                minutes_to_time(current.saturating_add(duration)),
            )
        })
        .collect()
}
