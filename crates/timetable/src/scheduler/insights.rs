//! Utilization, conflict and advisory figures computed from derived views.

use std::collections::{BTreeMap, HashSet};

use super::time::time_to_minutes;
use super::types::{
    DaySchedule, FacultySchedule, Recommendation, RecommendationKind, RoomSchedule,
    RoomUtilization, ScheduleInsights, SubjectPlan,
};

const LOW_UTILIZATION: f64 = 50.0;
const HIGH_UTILIZATION: f64 = 90.0;

/// Percentage of non-break slots that hold a subject. Zero for a grid with no
/// teachable slots.
pub fn calculate_utilization(schedule: &DaySchedule) -> f64 {
    let (teachable, assigned) = schedule
        .values()
        .flatten()
        .filter(|slot| !slot.is_break)
        .fold((0u32, 0u32), |(total, used), slot| {
            (total + 1, used + u32::from(slot.is_assigned()))
        });

    if teachable == 0 {
        return 0.0;
    }
    100.0 * f64::from(assigned) / f64::from(teachable)
}

/// Counts pairs of assigned slots on the same day whose times overlap.
///
/// Grids built by the greedy assigner hold at most one subject per slot and
/// their slots never overlap, so this is always zero for them.
pub fn count_conflicts(schedule: &DaySchedule) -> u32 {
    let mut conflicts = 0;

    for slots in schedule.values() {
        let assigned: Vec<(u32, u32)> = slots
            .iter()
            .filter(|slot| slot.is_assigned())
            .filter_map(|slot| {
                Some((time_to_minutes(&slot.start_time)?, time_to_minutes(&slot.end_time)?))
            })
            .collect();

        for (i, (start_a, end_a)) in assigned.iter().enumerate() {
            for (start_b, end_b) in &assigned[i + 1..] {
                if start_a < end_b && start_b < end_a {
                    conflicts += 1;
                }
            }
        }
    }

    conflicts
}

/// Number of distinct faculty ids referenced by any subject.
pub fn count_active_faculty(subjects: &[SubjectPlan]) -> usize {
    subjects
        .iter()
        .flat_map(|s| s.faculty.iter().map(|f| f.id.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

/// Requested classes that no room could hold, counted once per subject.
///
/// Room placements are listed in subject order, so entry `i` of every room
/// belongs to `subjects[i]`. The best room counts; without rooms nothing is
/// placed.
pub fn count_unplaced(rooms: &[RoomSchedule], subjects: &[SubjectPlan]) -> u64 {
    subjects
        .iter()
        .enumerate()
        .map(|(i, subject)| {
            let placed = rooms
                .iter()
                .filter_map(|r| r.placement.get(i))
                .map(|p| p.placed)
                .max()
                .unwrap_or(0);
            u64::from(subject.no_of_classes_per_week.saturating_sub(placed))
        })
        .sum()
}

/// The `HH:MM-HH:MM` slot with the most classes across all rooms and days.
///
/// Ties go to the earliest slot; `"N/A"` when nothing is placed.
pub fn calculate_peak_time(rooms: &[RoomSchedule]) -> String {
    let mut counts: BTreeMap<(u32, String), u32> = BTreeMap::new();

    for slot in rooms
        .iter()
        .flat_map(|r| r.schedule.values().flatten())
        .filter(|slot| slot.is_assigned())
    {
        let order = time_to_minutes(&slot.start_time).unwrap_or(u32::MAX);
        let label = format!("{}-{}", slot.start_time, slot.end_time);
        *counts.entry((order, label)).or_default() += 1;
    }

    let mut peak: Option<(&str, u32)> = None;
    for ((_, label), count) in &counts {
        if peak.map_or(true, |(_, best)| *count > best) {
            peak = Some((label.as_str(), *count));
        }
    }

    peak.map(|(label, _)| label.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Builds advisory messages from the views.
pub fn generate_recommendations(
    rooms: &[RoomSchedule],
    faculty: &[FacultySchedule],
    conflicts: u32,
    unplaced: u64,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let underused: Vec<&str> = rooms
        .iter()
        .filter(|r| r.utilization < LOW_UTILIZATION)
        .map(|r| r.room_id.as_str())
        .collect();
    if !underused.is_empty() {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Optimization,
            title: "Optimize Room Usage".to_string(),
            description: format!(
                "Rooms below {}% utilization: {}. Consider consolidating classes into fewer rooms.",
                LOW_UTILIZATION,
                underused.join(", ")
            ),
        });
    }

    let saturated: Vec<&str> = rooms
        .iter()
        .filter(|r| r.utilization > HIGH_UTILIZATION)
        .map(|r| r.room_id.as_str())
        .collect();
    if !saturated.is_empty() {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Efficiency,
            title: "Rooms Near Capacity".to_string(),
            description: format!(
                "Rooms above {}% utilization: {}. Additional rooms would leave room for rescheduling.",
                HIGH_UTILIZATION,
                saturated.join(", ")
            ),
        });
    }

    if !faculty.is_empty() {
        let average =
            faculty.iter().map(|f| f.teaching_hours).sum::<f64>() / faculty.len() as f64;
        let overloaded: Vec<&str> = faculty
            .iter()
            .filter(|f| average > 0.0 && f.teaching_hours > 2.0 * average)
            .map(|f| f.name.as_str())
            .collect();
        if !overloaded.is_empty() {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Workload,
                title: "Faculty Workload Balance".to_string(),
                description: format!(
                    "Teaching load is more than twice the average for: {}.",
                    overloaded.join(", ")
                ),
            });
        }
    }

    if conflicts > 0 || unplaced > 0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Conflict,
            title: "Unscheduled Classes".to_string(),
            description: format!(
                "{} requested classes could not be placed within faculty availability and {} slot conflicts were found. Widen availability windows or add faculty.",
                unplaced, conflicts
            ),
        });
    }

    recommendations
}

/// Aggregates room and faculty views into dashboard insights.
pub fn build_insights(
    rooms: &[RoomSchedule],
    faculty: &[FacultySchedule],
    subjects: &[SubjectPlan],
) -> ScheduleInsights {
    let room_utilization: Vec<RoomUtilization> = rooms
        .iter()
        .map(|r| RoomUtilization {
            room_id: r.room_id.clone(),
            utilization: r.utilization,
        })
        .collect();

    let avg_utilization = if room_utilization.is_empty() {
        0.0
    } else {
        room_utilization.iter().map(|r| r.utilization).sum::<f64>()
            / room_utilization.len() as f64
    };
    let conflicts = rooms.iter().map(|r| r.conflicts).sum();

    ScheduleInsights {
        avg_utilization,
        conflicts,
        peak_time: calculate_peak_time(rooms),
        active_faculty: count_active_faculty(subjects),
        recommendations: generate_recommendations(
            rooms,
            faculty,
            conflicts,
            count_unplaced(rooms, subjects),
        ),
        room_utilization,
    }
}
