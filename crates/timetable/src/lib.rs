//! Academic timetable administration API.
//!
//! CRUD over faculty, subjects, rooms, breaks and college hours, derived
//! per-room and per-faculty weekly views built by greedy slot assignment, and
//! a proxy to an external solver that produces the real timetable.

pub mod auth;
pub mod config;
pub mod db;
pub mod scheduler;
pub mod server;
pub mod solver;
pub mod types;
pub mod validation;
