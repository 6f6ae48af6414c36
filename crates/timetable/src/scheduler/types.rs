//! Types consumed and produced by the slot-assignment engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A teaching day. The week runs Monday through Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Every teaching day, in grid order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "MONDAY",
            Weekday::Tuesday => "TUESDAY",
            Weekday::Wednesday => "WEDNESDAY",
            Weekday::Thursday => "THURSDAY",
            Weekday::Friday => "FRIDAY",
            Weekday::Saturday => "SATURDAY",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown day: {}", s))
    }
}

/// The day a break applies to: a single weekday or every day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    AllDays,
}

impl BreakDay {
    /// Returns true if a break on this day applies to `day`.
    pub fn covers(&self, day: Weekday) -> bool {
        match self.weekday() {
            Some(d) => d == day,
            None => true,
        }
    }

    fn weekday(&self) -> Option<Weekday> {
        match self {
            BreakDay::Monday => Some(Weekday::Monday),
            BreakDay::Tuesday => Some(Weekday::Tuesday),
            BreakDay::Wednesday => Some(Weekday::Wednesday),
            BreakDay::Thursday => Some(Weekday::Thursday),
            BreakDay::Friday => Some(Weekday::Friday),
            BreakDay::Saturday => Some(Weekday::Saturday),
            BreakDay::AllDays => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self.weekday() {
            Some(d) => d.as_str(),
            None => "ALL_DAYS",
        }
    }
}

impl fmt::Display for BreakDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BreakDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ALL_DAYS") {
            return Ok(BreakDay::AllDays);
        }

        match Weekday::from_str(s)? {
            Weekday::Monday => Ok(BreakDay::Monday),
            Weekday::Tuesday => Ok(BreakDay::Tuesday),
            Weekday::Wednesday => Ok(BreakDay::Wednesday),
            Weekday::Thursday => Ok(BreakDay::Thursday),
            Weekday::Friday => Ok(BreakDay::Friday),
            Weekday::Saturday => Ok(BreakDay::Saturday),
        }
    }
}

/// Institution operating hours (`HH:MM`, 24h).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeHours {
    pub start_time: String,
    pub end_time: String,
}

/// A non-teaching window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakWindow {
    pub day: BreakDay,
    pub start_time: String,
    pub end_time: String,
}

/// A window during which a faculty member declares they can teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
}

/// A faculty member as embedded in a subject plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
}

/// A subject together with the faculty assigned to teach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPlan {
    pub name: String,
    pub duration: u32,
    pub no_of_classes_per_week: u32,
    #[serde(default)]
    pub faculty: Vec<FacultyPlan>,
}

/// The payload exchanged with the external scheduling service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub college_time: CollegeHours,
    #[serde(default)]
    pub break_: Vec<BreakWindow>,
    #[serde(default)]
    pub rooms: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<SubjectPlan>,
}

/// A single grid cell in a generated view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default)]
    pub is_break: bool,
}

impl TimeSlot {
    /// Creates an empty slot.
    pub fn new(start_time: String, end_time: String) -> Self {
        Self {
            start_time,
            end_time,
            subject: None,
            faculty: None,
            room: None,
            is_break: false,
        }
    }

    /// Returns true if a subject has been placed in this slot.
    pub fn is_assigned(&self) -> bool {
        self.subject.is_some()
    }
}

/// Slots for each day of the week, in day order.
pub type DaySchedule = BTreeMap<Weekday, Vec<TimeSlot>>;

/// How many classes of a subject made it onto a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPlacement {
    pub subject: String,
    pub requested: u32,
    pub placed: u32,
    /// Availability windows that had no free slot left.
    pub dropped_windows: u32,
}

impl SubjectPlacement {
    pub fn is_partial(&self) -> bool {
        self.placed < self.requested
    }
}

/// Derived weekly view of one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSchedule {
    pub room_id: String,
    pub name: String,
    pub schedule: DaySchedule,
    pub utilization: f64,
    pub conflicts: u32,
    pub subjects: Vec<String>,
    pub placement: Vec<SubjectPlacement>,
    pub partially_scheduled: bool,
}

/// Derived weekly view of one faculty member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultySchedule {
    pub faculty_id: String,
    pub name: String,
    pub schedule: DaySchedule,
    pub teaching_hours: f64,
    pub subjects: Vec<String>,
    pub placement: Vec<SubjectPlacement>,
    pub partially_scheduled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUtilization {
    pub room_id: String,
    pub utilization: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Optimization,
    Workload,
    Efficiency,
    Conflict,
}

/// Free-text advisory produced from the derived views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInsights {
    pub avg_utilization: f64,
    pub conflicts: u32,
    pub peak_time: String,
    pub active_faculty: usize,
    pub room_utilization: Vec<RoomUtilization>,
    pub recommendations: Vec<Recommendation>,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_rooms: usize,
    pub active_faculty: usize,
    pub weekly_classes: u64,
    pub avg_utilization: f64,
}
