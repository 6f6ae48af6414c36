//! Greedy first-fit placement of subjects into a weekly slot grid.
//!
//! Subjects are walked in input order. For every availability window of every
//! faculty member on a subject, the earliest slot of that day which is free,
//! not a break and starts inside the window receives the subject. Nothing is
//! ever moved once placed, so a later subject simply loses contested slots.
//! Windows without a free slot are counted in [`SubjectPlacement`] rather than
//! raised as errors.

use super::breaks::overlay_breaks;
use super::insights::{calculate_utilization, count_conflicts};
use super::time::{generate_time_slots, time_to_minutes};
use super::types::{
    AvailabilityWindow, BreakWindow, CollegeHours, DaySchedule, FacultyPlan, FacultySchedule,
    RoomSchedule, SubjectPlacement, SubjectPlan, TimeSlot, Weekday,
};

/// Builds an empty six-day grid with breaks marked.
///
/// Without college hours every day is present but has no slots.
pub fn build_week_grid(
    hours: Option<&CollegeHours>,
    breaks: &[BreakWindow],
    slot_minutes: u32,
) -> DaySchedule {
    let mut grid: DaySchedule = Weekday::ALL
        .into_iter()
        .map(|day| {
            let slots = hours
                .map(|h| generate_time_slots(&h.start_time, &h.end_time, slot_minutes))
                .unwrap_or_default();
            (day, slots)
        })
        .collect();

    overlay_breaks(&mut grid, breaks);
    grid
}

/// Places `subjects` onto `grid`.
///
/// - `room`: stamped onto every placed slot, if given.
/// - `only_faculty`: when set, only that faculty member's availability is
///   walked and subjects they do not teach are skipped.
pub fn assign_subjects(
    grid: &mut DaySchedule,
    subjects: &[SubjectPlan],
    room: Option<&str>,
    only_faculty: Option<&str>,
) -> Vec<SubjectPlacement> {
    let mut placements = Vec::with_capacity(subjects.len());

    for subject in subjects {
        let teachers: Vec<&FacultyPlan> = subject
            .faculty
            .iter()
            .filter(|f| only_faculty.map_or(true, |id| f.id == id))
            .collect();
        if only_faculty.is_some() && teachers.is_empty() {
            continue;
        }

        let mut placement = SubjectPlacement {
            subject: subject.name.clone(),
            requested: subject.no_of_classes_per_week,
            placed: 0,
            dropped_windows: 0,
        };

        for faculty in teachers {
            for window in &faculty.availability {
                let Some(slots) = grid.get_mut(&window.day) else {
                    placement.dropped_windows += 1;
                    continue;
                };

                match first_free_slot(slots, window) {
                    Some(slot) => {
                        slot.subject = Some(subject.name.clone());
                        slot.faculty = Some(faculty.name.clone());
                        slot.room = room.map(str::to_string);
                        placement.placed += 1;
                    }
                    None => placement.dropped_windows += 1,
                }
            }
        }

        placements.push(placement);
    }

    placements
}

/// Finds the earliest unassigned, non-break slot starting inside `window`.
fn first_free_slot<'a>(
    slots: &'a mut [TimeSlot],
    window: &AvailabilityWindow,
) -> Option<&'a mut TimeSlot> {
    let start = time_to_minutes(&window.start_time)?;
    let end = time_to_minutes(&window.end_time)?;

    slots.iter_mut().find(|slot| {
        !slot.is_assigned()
            && !slot.is_break
            && time_to_minutes(&slot.start_time).is_some_and(|s| s >= start && s < end)
    })
}

/// Builds the weekly view of one room.
///
/// Every subject is considered for the room; there is no room preference on
/// subjects, so each room view is an independent placement of the whole
/// subject list.
pub fn room_schedule(
    room_id: &str,
    room_name: &str,
    hours: Option<&CollegeHours>,
    breaks: &[BreakWindow],
    subjects: &[SubjectPlan],
    slot_minutes: u32,
) -> RoomSchedule {
    let mut schedule = build_week_grid(hours, breaks, slot_minutes);
    let placement = assign_subjects(&mut schedule, subjects, Some(room_id), None);

    let subjects = placement
        .iter()
        .filter(|p| p.placed > 0)
        .map(|p| p.subject.clone())
        .collect();

    RoomSchedule {
        room_id: room_id.to_string(),
        name: room_name.to_string(),
        utilization: calculate_utilization(&schedule),
        conflicts: count_conflicts(&schedule),
        subjects,
        partially_scheduled: placement.iter().any(SubjectPlacement::is_partial),
        placement,
        schedule,
    }
}

/// Builds the weekly view of one faculty member from the subjects they teach.
pub fn faculty_schedule(
    faculty_id: &str,
    faculty_name: &str,
    hours: Option<&CollegeHours>,
    breaks: &[BreakWindow],
    subjects: &[SubjectPlan],
    slot_minutes: u32,
) -> FacultySchedule {
    let mut schedule = build_week_grid(hours, breaks, slot_minutes);
    let placement = assign_subjects(&mut schedule, subjects, None, Some(faculty_id));

    let assigned = schedule
        .values()
        .flatten()
        .filter(|slot| slot.is_assigned())
        .count() as f64;

    FacultySchedule {
        faculty_id: faculty_id.to_string(),
        name: faculty_name.to_string(),
        teaching_hours: assigned * f64::from(slot_minutes) / 60.0,
        subjects: placement.iter().map(|p| p.subject.clone()).collect(),
        partially_scheduled: placement.iter().any(SubjectPlacement::is_partial),
        placement,
        schedule,
    }
}
