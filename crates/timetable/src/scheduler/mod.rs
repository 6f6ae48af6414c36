//! Derived schedule views: slot grids, greedy placement and insights.
pub mod assign;
pub mod breaks;
pub mod insights;
pub mod time;
pub mod types;

use std::collections::HashMap;

use crate::db::{BreakPeriod, CollegeTime, Faculty, Room, Subject};
use types::{
    BreakWindow, DashboardStats, FacultyPlan, FacultySchedule, RoomSchedule, ScheduleInsights,
    ScheduleRequest, SubjectPlan,
};

/// Default slot length in minutes.
pub const DEFAULT_SLOT_MINUTES: u32 = 50;

/// The stored entities a derived view is computed from.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    pub college_time: Option<CollegeTime>,
    pub breaks: Vec<BreakPeriod>,
    pub rooms: Vec<Room>,
    pub faculty: Vec<Faculty>,
    pub subjects: Vec<Subject>,
}

impl ScheduleSnapshot {
    /// Subjects with their faculty ids resolved to full faculty records.
    /// Ids that no longer exist are skipped.
    pub fn subject_plans(&self) -> Vec<SubjectPlan> {
        let by_id: HashMap<&str, &Faculty> =
            self.faculty.iter().map(|f| (f.id.as_str(), f)).collect();

        self.subjects
            .iter()
            .map(|subject| SubjectPlan {
                name: subject.name.clone(),
                duration: subject.duration,
                no_of_classes_per_week: subject.no_of_classes_per_week,
                faculty: subject
                    .faculty_ids
                    .iter()
                    .filter_map(|id| by_id.get(id.as_str()))
                    .map(|f| FacultyPlan {
                        id: f.id.clone(),
                        name: f.name.clone(),
                        availability: f.availability.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn break_windows(&self) -> Vec<BreakWindow> {
        self.breaks.iter().map(BreakPeriod::window).collect()
    }

    /// Assembles the solver payload. `None` until college time is configured.
    pub fn to_request(&self) -> Option<ScheduleRequest> {
        let college_time = self.college_time.as_ref()?.hours();

        Some(ScheduleRequest {
            college_time,
            break_: self.break_windows(),
            rooms: self.rooms.iter().map(|r| r.id.clone()).collect(),
            subjects: self.subject_plans(),
        })
    }

    /// Weekly view of a room, or `None` for an unknown room id.
    pub fn room_schedule(&self, room_id: &str, slot_minutes: u32) -> Option<RoomSchedule> {
        let room = self.rooms.iter().find(|r| r.id == room_id)?;
        Some(assign::room_schedule(
            &room.id,
            &room.name,
            self.college_time.as_ref().map(CollegeTime::hours).as_ref(),
            &self.break_windows(),
            &self.subject_plans(),
            slot_minutes,
        ))
    }

    /// Weekly view of a faculty member, or `None` for an unknown id.
    pub fn faculty_schedule(&self, faculty_id: &str, slot_minutes: u32) -> Option<FacultySchedule> {
        let faculty = self.faculty.iter().find(|f| f.id == faculty_id)?;
        Some(assign::faculty_schedule(
            &faculty.id,
            &faculty.name,
            self.college_time.as_ref().map(CollegeTime::hours).as_ref(),
            &self.break_windows(),
            &self.subject_plans(),
            slot_minutes,
        ))
    }

    /// Weekly views of every room, in storage order.
    pub fn room_schedules(&self, slot_minutes: u32) -> Vec<RoomSchedule> {
        let hours = self.college_time.as_ref().map(CollegeTime::hours);
        let breaks = self.break_windows();
        let plans = self.subject_plans();

        self.rooms
            .iter()
            .map(|r| assign::room_schedule(&r.id, &r.name, hours.as_ref(), &breaks, &plans, slot_minutes))
            .collect()
    }

    /// Weekly views of every faculty member, in storage order.
    pub fn faculty_schedules(&self, slot_minutes: u32) -> Vec<FacultySchedule> {
        let hours = self.college_time.as_ref().map(CollegeTime::hours);
        let breaks = self.break_windows();
        let plans = self.subject_plans();

        self.faculty
            .iter()
            .map(|f| {
                assign::faculty_schedule(&f.id, &f.name, hours.as_ref(), &breaks, &plans, slot_minutes)
            })
            .collect()
    }

    pub fn insights(&self, slot_minutes: u32) -> ScheduleInsights {
        insights::build_insights(
            &self.room_schedules(slot_minutes),
            &self.faculty_schedules(slot_minutes),
            &self.subject_plans(),
        )
    }

    pub fn stats(&self, slot_minutes: u32) -> DashboardStats {
        let insights = self.insights(slot_minutes);

        DashboardStats {
            total_rooms: self.rooms.len(),
            active_faculty: insights.active_faculty,
            weekly_classes: self
                .subjects
                .iter()
                .map(|s| u64::from(s.no_of_classes_per_week))
                .sum(),
            avg_utilization: insights.avg_utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{AvailabilityWindow, BreakDay, Weekday};

    fn snapshot() -> ScheduleSnapshot {
        let created_at = "2024-01-01T00:00:00Z".to_string();
        ScheduleSnapshot {
            college_time: Some(CollegeTime {
                start_time: "09:30".to_string(),
                end_time: "16:30".to_string(),
                created_at: created_at.clone(),
            }),
            breaks: vec![BreakPeriod {
                id: "B1".to_string(),
                day: BreakDay::Monday,
                start_time: "13:00".to_string(),
                end_time: "13:30".to_string(),
                created_at: created_at.clone(),
            }],
            rooms: vec![Room {
                id: "R1".to_string(),
                name: "Lab".to_string(),
                capacity: Some(30),
                created_at: created_at.clone(),
            }],
            faculty: vec![Faculty {
                id: "F1".to_string(),
                name: "Ada".to_string(),
                availability: vec![AvailabilityWindow {
                    day: Weekday::Monday,
                    start_time: "09:30".to_string(),
                    end_time: "11:00".to_string(),
                }],
                created_at: created_at.clone(),
            }],
            subjects: vec![Subject {
                id: "S1".to_string(),
                name: "Math".to_string(),
                duration: 50,
                no_of_classes_per_week: 2,
                faculty_ids: vec!["F1".to_string(), "gone".to_string()],
                created_at,
            }],
        }
    }

    #[test]
    fn test_subject_plans_skip_unknown_faculty() {
        let plans = snapshot().subject_plans();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].faculty.len(), 1);
        assert_eq!(plans[0].faculty[0].name, "Ada");
    }

    #[test]
    fn test_request_requires_college_time() {
        let mut snap = snapshot();
        let request = snap.to_request().unwrap();
        assert_eq!(request.rooms, vec!["R1".to_string()]);
        assert_eq!(request.break_.len(), 1);

        snap.college_time = None;
        assert!(snap.to_request().is_none());
    }

    #[test]
    fn test_room_view_scenario() {
        let view = snapshot()
            .room_schedule("R1", DEFAULT_SLOT_MINUTES)
            .unwrap();
        assert_eq!(view.schedule.len(), 6);

        let monday = &view.schedule[&Weekday::Monday];
        assert_eq!(monday[0].subject.as_deref(), Some("Math"));
        assert_eq!(monday[0].room.as_deref(), Some("R1"));
        assert!(monday[1].subject.is_none());
        assert!(monday.iter().any(|s| s.is_break && s.start_time == "12:50"));
        assert!(view.partially_scheduled);

        assert!(snapshot().room_schedule("nope", DEFAULT_SLOT_MINUTES).is_none());
    }

    #[test]
    fn test_missing_college_time_gives_empty_grids() {
        let mut snap = snapshot();
        snap.college_time = None;

        let view = snap.faculty_schedule("F1", DEFAULT_SLOT_MINUTES).unwrap();
        assert_eq!(view.schedule.len(), 6);
        assert!(view.schedule.values().all(Vec::is_empty));
        assert_eq!(view.teaching_hours, 0.0);
    }

    #[test]
    fn test_stats() {
        let stats = snapshot().stats(DEFAULT_SLOT_MINUTES);
        assert_eq!(stats.total_rooms, 1);
        assert_eq!(stats.active_faculty, 1);
        assert_eq!(stats.weekly_classes, 2);
        assert!(stats.avg_utilization > 0.0 && stats.avg_utilization < 50.0);
    }

    #[test]
    fn test_stats_with_large_class_counts() {
        let mut snap = snapshot();
        let mut second = snap.subjects[0].clone();
        second.id = "S2".to_string();
        snap.subjects.push(second);
        for subject in &mut snap.subjects {
            subject.no_of_classes_per_week = u32::MAX;
        }

        let stats = snap.stats(DEFAULT_SLOT_MINUTES);
        assert_eq!(stats.weekly_classes, 2 * u64::from(u32::MAX));
        assert!(snap
            .insights(DEFAULT_SLOT_MINUTES)
            .recommendations
            .iter()
            .any(|r| r.description.starts_with(&(2 * u64::from(u32::MAX) - 2).to_string())));
    }
}
