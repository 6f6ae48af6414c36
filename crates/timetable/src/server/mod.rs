use std::sync::Arc;

use axum::routing::{get, post, put, MethodRouter};
use axum::{middleware as mw, Router};

use crate::server::endpoints::{
    auth, breaks, college_time, faculty, generate, rooms, scheduler, schedules, status, subjects,
};
use crate::server::middleware::*;
use crate::types::AppState;

mod endpoints;
mod middleware;
pub mod types;

/// Restricts a method router to admins.
fn admin(route: MethodRouter<Arc<AppState>>) -> MethodRouter<Arc<AppState>> {
    route.route_layer(mw::from_fn(role_validator::require_admin))
}

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router. Everything under `/api` except login and signup requires a
/// session; mutations additionally require the `admin` role.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let public_router = Router::new()
        .route("/auth/login", post(auth::post_login))
        .route("/auth/signup", post(auth::post_signup));

    let session_router = Router::new()
        .route("/auth/me", get(auth::get_me))
        .route("/auth/logout", post(auth::post_logout))
        .route(
            "/faculty",
            get(faculty::get_all_faculty).merge(admin(post(faculty::post_faculty))),
        )
        .route(
            "/faculty/:id",
            get(faculty::get_faculty)
                .merge(admin(put(faculty::put_faculty).delete(faculty::delete_faculty))),
        )
        .route(
            "/subjects",
            get(subjects::get_subjects).merge(admin(post(subjects::post_subject))),
        )
        .route(
            "/subjects/:id",
            get(subjects::get_subject)
                .merge(admin(put(subjects::put_subject).delete(subjects::delete_subject))),
        )
        .route(
            "/rooms",
            get(rooms::get_rooms).merge(admin(post(rooms::post_room))),
        )
        .route(
            "/rooms/:id",
            get(rooms::get_room).merge(admin(put(rooms::put_room).delete(rooms::delete_room))),
        )
        .route(
            "/breaks",
            get(breaks::get_breaks).merge(admin(post(breaks::post_break))),
        )
        .route(
            "/breaks/:id",
            get(breaks::get_break).merge(admin(put(breaks::put_break).delete(breaks::delete_break))),
        )
        .route(
            "/college-time",
            get(college_time::get_college_time)
                .merge(admin(post(college_time::post_college_time))),
        )
        .route(
            "/generate-schedule",
            admin(post(generate::post_generate_schedule)),
        )
        .route(
            "/schedule-request",
            admin(get(generate::get_schedule_request)),
        )
        .route("/schedules", get(schedules::get_schedules))
        .route("/schedules/:name", get(schedules::get_schedule))
        .route("/scheduler/rooms", get(scheduler::get_room_schedules))
        .route("/scheduler/rooms/:id", get(scheduler::get_room_schedule))
        .route("/scheduler/faculty", get(scheduler::get_faculty_schedules))
        .route("/scheduler/faculty/:id", get(scheduler::get_faculty_schedule))
        .route("/scheduler/insights", get(scheduler::get_insights))
        .route("/scheduler/stats", get(scheduler::get_stats))
        .layer(mw::from_fn_with_state(
            app_state.clone(),
            session_validator::validate_session,
        ));

    Router::new()
        .route("/health", get(status::get_health))
        .nest("/api", public_router.merge(session_router))
        .with_state(app_state)
}
