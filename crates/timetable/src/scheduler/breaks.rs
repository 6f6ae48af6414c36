//! Marks grid slots that fall in a break.

use super::time::time_to_minutes;
use super::types::{BreakWindow, DaySchedule, Weekday};

/// Returns true if the slot `[slot_start, slot_end)` on `day` overlaps any
/// break that applies to that day.
///
/// Breaks with unparseable bounds never match.
pub fn is_break_time(day: Weekday, slot_start: u32, slot_end: u32, breaks: &[BreakWindow]) -> bool {
    breaks.iter().filter(|b| b.day.covers(day)).any(|b| {
        match (time_to_minutes(&b.start_time), time_to_minutes(&b.end_time)) {
            (Some(start), Some(end)) => slot_start < end && slot_end > start,
            _ => false,
        }
    })
}

/// Sets `is_break` on every slot of `grid` that overlaps a break.
pub fn overlay_breaks(grid: &mut DaySchedule, breaks: &[BreakWindow]) {
    for (day, slots) in grid.iter_mut() {
        for slot in slots.iter_mut() {
            if let (Some(start), Some(end)) =
                (time_to_minutes(&slot.start_time), time_to_minutes(&slot.end_time))
            {
                slot.is_break = is_break_time(*day, start, end, breaks);
            }
        }
    }
}
