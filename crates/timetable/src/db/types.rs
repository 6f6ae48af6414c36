/// Database record types for timetable administration data
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::scheduler::types::{AvailabilityWindow, BreakDay, BreakWindow, CollegeHours};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub availability: Vec<AvailabilityWindow>,
    pub created_at: String,
}

/// Faculty fields as accepted on create/update. The id is generated when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFaculty {
    pub id: Option<String>,
    pub name: String,
    pub availability: Vec<AvailabilityWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub duration: u32,
    #[serde(rename = "no_of_classes_per_week")]
    pub no_of_classes_per_week: u32,
    pub faculty_ids: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSubject {
    pub name: String,
    pub duration: u32,
    pub no_of_classes_per_week: u32,
    pub faculty_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRoom {
    pub id: Option<String>,
    pub name: String,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakPeriod {
    pub id: String,
    pub day: BreakDay,
    pub start_time: String,
    pub end_time: String,
    pub created_at: String,
}

impl BreakPeriod {
    pub fn window(&self) -> BreakWindow {
        BreakWindow {
            day: self.day,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBreak {
    pub day: BreakDay,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeTime {
    pub start_time: String,
    pub end_time: String,
    pub created_at: String,
}

impl CollegeTime {
    pub fn hours(&self) -> CollegeHours {
        CollegeHours {
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScheduleSummary {
    pub name: String,
    pub created_at: String,
}
