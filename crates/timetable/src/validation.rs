//! Field-level validation of incoming entity payloads.
//!
//! Payloads deserialize with every field optional so that a missing field is
//! reported as a validation error rather than a JSON rejection, and so that
//! an update can be merged onto the stored record before being checked.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::db::{BreakPeriod, Faculty, NewBreak, NewFaculty, NewRoom, NewSubject, Room, Subject};
use crate::scheduler::time::time_to_minutes;
use crate::scheduler::types::{AvailabilityWindow, BreakDay, CollegeHours, ScheduleRequest, Weekday};

static CLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;
/// A class can last at most a whole day.
const MAX_DURATION_MINUTES: i64 = 24 * 60;
/// One class per hour over a six-day week.
const MAX_CLASSES_PER_WEEK: i64 = 6 * 24;
const MAX_ROOM_CAPACITY: i64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

pub type Validated<T> = Result<T, Vec<FieldError>>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPayload {
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl From<&AvailabilityWindow> for WindowPayload {
    fn from(window: &AvailabilityWindow) -> Self {
        Self {
            day: Some(window.day.to_string()),
            start_time: Some(window.start_time.clone()),
            end_time: Some(window.end_time.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub availability: Option<Vec<WindowPayload>>,
}

impl FacultyPayload {
    /// Fills fields missing from an update with the stored values.
    pub fn fill_from(mut self, existing: &Faculty) -> Self {
        self.id = None;
        self.name = self.name.or_else(|| Some(existing.name.clone()));
        self.availability = self
            .availability
            .or_else(|| Some(existing.availability.iter().map(WindowPayload::from).collect()));
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPayload {
    pub name: Option<String>,
    pub duration: Option<i64>,
    #[serde(rename = "no_of_classes_per_week", alias = "classesPerWeek")]
    pub no_of_classes_per_week: Option<i64>,
    pub faculty_ids: Option<Vec<String>>,
    /// Single-teacher form sent by older clients; joins `faculty_ids`.
    pub faculty_id: Option<String>,
}

impl SubjectPayload {
    pub fn fill_from(mut self, existing: &Subject) -> Self {
        self.name = self.name.or_else(|| Some(existing.name.clone()));
        self.duration = self.duration.or(Some(i64::from(existing.duration)));
        self.no_of_classes_per_week = self
            .no_of_classes_per_week
            .or(Some(i64::from(existing.no_of_classes_per_week)));
        if self.faculty_ids.is_none() && self.faculty_id.is_none() {
            self.faculty_ids = Some(existing.faculty_ids.clone());
        }
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub capacity: Option<i64>,
}

impl RoomPayload {
    pub fn fill_from(mut self, existing: &Room) -> Self {
        self.id = None;
        self.name = self.name.or_else(|| Some(existing.name.clone()));
        self.capacity = self.capacity.or(existing.capacity.map(i64::from));
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakPayload {
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl BreakPayload {
    pub fn fill_from(mut self, existing: &BreakPeriod) -> Self {
        self.day = self.day.or_else(|| Some(existing.day.to_string()));
        self.start_time = self
            .start_time
            .or_else(|| Some(existing.start_time.clone()));
        self.end_time = self.end_time.or_else(|| Some(existing.end_time.clone()));
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeTimePayload {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupPayload {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Signup fields after validation. The password is still in plain text.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn text(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                self.push(field, "is required");
                None
            }
        }
    }

    fn clock(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let value = self.text(field, value)?;
        if CLOCK_REGEX.is_match(&value) {
            Some(value)
        } else {
            self.push(field, "must be a 24h time in HH:MM format");
            None
        }
    }

    /// Checks both ends of a time range and that the range is not empty.
    fn clock_range(
        &mut self,
        prefix: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Option<(String, String)> {
        let start = self.clock(&format!("{prefix}startTime"), start);
        let end = self.clock(&format!("{prefix}endTime"), end);
        let (start, end) = (start?, end?);

        if time_to_minutes(&start) >= time_to_minutes(&end) {
            self.push(format!("{prefix}endTime"), "must be after startTime");
            return None;
        }
        Some((start, end))
    }

    fn positive(&mut self, field: &str, value: Option<i64>, max: i64) -> Option<u32> {
        match value {
            None => {
                self.push(field, "is required");
                None
            }
            Some(v) if v < 1 => {
                self.push(field, "must be at least 1");
                None
            }
            Some(v) if v > max => {
                self.push(field, format!("must be at most {max}"));
                None
            }
            Some(v) => u32::try_from(v).ok(),
        }
    }

    fn weekday(&mut self, field: &str, value: Option<&str>) -> Option<Weekday> {
        let value = self.text(field, value)?;
        match value.parse() {
            Ok(day) => Some(day),
            Err(e) => {
                self.push(field, e);
                None
            }
        }
    }

    fn window(&mut self, prefix: &str, window: &WindowPayload) -> Option<AvailabilityWindow> {
        let day = self.weekday(&format!("{prefix}day"), window.day.as_deref());
        let range = self.clock_range(
            prefix,
            window.start_time.as_deref(),
            window.end_time.as_deref(),
        );
        let (start_time, end_time) = range?;

        Some(AvailabilityWindow {
            day: day?,
            start_time,
            end_time,
        })
    }

    fn into_result<T>(self, value: Option<T>) -> Validated<T> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(self.0),
        }
    }
}

fn optional_id(errors: &mut Errors, id: Option<&str>) -> Option<String> {
    let id = id?.trim();
    if id.is_empty() {
        errors.push("id", "must not be empty when given");
        None
    } else {
        Some(id.to_string())
    }
}

pub fn validate_faculty(payload: &FacultyPayload) -> Validated<NewFaculty> {
    let mut errors = Errors::default();

    let id = optional_id(&mut errors, payload.id.as_deref());
    let name = errors.text("name", payload.name.as_deref());

    let availability = match payload.availability.as_deref() {
        None | Some([]) => {
            errors.push("availability", "at least one availability window is required");
            None
        }
        Some(windows) => windows
            .iter()
            .enumerate()
            .map(|(i, w)| errors.window(&format!("availability[{i}]."), w))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Option<Vec<_>>>(),
    };

    let faculty = match (name, availability) {
        (Some(name), Some(availability)) => Some(NewFaculty {
            id,
            name,
            availability,
        }),
        _ => None,
    };
    errors.into_result(faculty)
}

pub fn validate_subject(payload: &SubjectPayload) -> Validated<NewSubject> {
    let mut errors = Errors::default();

    let name = errors.text("name", payload.name.as_deref());
    let duration = errors.positive("duration", payload.duration, MAX_DURATION_MINUTES);
    let classes = errors.positive(
        "no_of_classes_per_week",
        payload.no_of_classes_per_week,
        MAX_CLASSES_PER_WEEK,
    );

    let mut faculty_ids: Vec<String> = Vec::new();
    for id in payload.faculty_ids.iter().flatten().chain(&payload.faculty_id) {
        let id = id.trim().to_string();
        if !faculty_ids.contains(&id) {
            faculty_ids.push(id);
        }
    }
    if faculty_ids.iter().any(String::is_empty) {
        errors.push("facultyIds", "must not contain empty ids");
    }

    let subject = match (name, duration, classes) {
        (Some(name), Some(duration), Some(no_of_classes_per_week)) => Some(NewSubject {
            name,
            duration,
            no_of_classes_per_week,
            faculty_ids,
        }),
        _ => None,
    };
    errors.into_result(subject)
}

pub fn validate_room(payload: &RoomPayload) -> Validated<NewRoom> {
    let mut errors = Errors::default();

    let id = optional_id(&mut errors, payload.id.as_deref());
    let name = errors.text("name", payload.name.as_deref());
    let capacity = match payload.capacity {
        Some(c) => errors.positive("capacity", Some(c), MAX_ROOM_CAPACITY).map(Some),
        None => Some(None),
    };

    let room = match (name, capacity) {
        (Some(name), Some(capacity)) => Some(NewRoom { id, name, capacity }),
        _ => None,
    };
    errors.into_result(room)
}

pub fn validate_break(payload: &BreakPayload) -> Validated<NewBreak> {
    let mut errors = Errors::default();

    let day = errors
        .text("day", payload.day.as_deref())
        .and_then(|d| match d.parse::<BreakDay>() {
            Ok(day) => Some(day),
            Err(e) => {
                errors.push("day", e);
                None
            }
        });
    let range = errors.clock_range(
        "",
        payload.start_time.as_deref(),
        payload.end_time.as_deref(),
    );

    let period = match (day, range) {
        (Some(day), Some((start_time, end_time))) => Some(NewBreak {
            day,
            start_time,
            end_time,
        }),
        _ => None,
    };
    errors.into_result(period)
}

pub fn validate_college_time(payload: &CollegeTimePayload) -> Validated<CollegeHours> {
    let mut errors = Errors::default();
    let hours = errors
        .clock_range(
            "",
            payload.start_time.as_deref(),
            payload.end_time.as_deref(),
        )
        .map(|(start_time, end_time)| CollegeHours {
            start_time,
            end_time,
        });
    errors.into_result(hours)
}

pub fn validate_signup(payload: &SignupPayload) -> Validated<SignupForm> {
    let mut errors = Errors::default();

    let username = errors
        .text("username", payload.username.as_deref())
        .filter(|u| {
            let ok = u.chars().count() >= MIN_USERNAME_LEN;
            if !ok {
                errors.push(
                    "username",
                    format!("must be at least {MIN_USERNAME_LEN} characters"),
                );
            }
            ok
        });
    let email = errors
        .text("email", payload.email.as_deref())
        .filter(|e| {
            let ok = EMAIL_REGEX.is_match(e);
            if !ok {
                errors.push("email", "must be a valid email address");
            }
            ok
        });

    let password = match payload.password.as_deref() {
        Some(p) if p.chars().count() >= MIN_PASSWORD_LEN => Some(p.to_string()),
        _ => {
            errors.push(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            );
            None
        }
    };

    let form = match (username, email, password) {
        (Some(username), Some(email), Some(password)) => Some(SignupForm {
            username,
            email: email.to_lowercase(),
            password,
        }),
        _ => None,
    };
    errors.into_result(form)
}

pub fn validate_login(payload: &LoginPayload) -> Validated<LoginForm> {
    let mut errors = Errors::default();

    let username = errors.text("username", payload.username.as_deref());
    let password = match payload.password.as_deref() {
        Some(p) if !p.is_empty() => Some(p.to_string()),
        _ => {
            errors.push("password", "is required");
            None
        }
    };

    let form = match (username, password) {
        (Some(username), Some(password)) => Some(LoginForm { username, password }),
        _ => None,
    };
    errors.into_result(form)
}

/// Checks a caller-supplied solver payload. Only times and counts are
/// checked; the solver owns every other constraint.
pub fn validate_schedule_request(request: &ScheduleRequest) -> Vec<FieldError> {
    let mut errors = Errors::default();

    errors.clock_range(
        "college_time.",
        Some(request.college_time.start_time.as_str()),
        Some(request.college_time.end_time.as_str()),
    );

    for (i, window) in request.break_.iter().enumerate() {
        errors.clock_range(
            &format!("break_[{i}]."),
            Some(window.start_time.as_str()),
            Some(window.end_time.as_str()),
        );
    }

    for (i, subject) in request.subjects.iter().enumerate() {
        let prefix = format!("subjects[{i}]");
        errors.text(&format!("{prefix}.name"), Some(subject.name.as_str()));
        if subject.duration == 0 {
            errors.push(format!("{prefix}.duration"), "must be at least 1");
        }
        if subject.no_of_classes_per_week == 0 {
            errors.push(format!("{prefix}.no_of_classes_per_week"), "must be at least 1");
        }

        for (j, faculty) in subject.faculty.iter().enumerate() {
            for (k, window) in faculty.availability.iter().enumerate() {
                errors.clock_range(
                    &format!("{prefix}.faculty[{j}].availability[{k}]."),
                    Some(window.start_time.as_str()),
                    Some(window.end_time.as_str()),
                );
            }
        }
    }

    errors.0
}
