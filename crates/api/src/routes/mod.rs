pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{
    auth, dashboard, instructor, message, notification, session_request, therapy_session, user,
};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                                 register (POST)
/// /auth/login                                    login (POST)
/// /auth/logout                                   revoke current session (POST)
/// /auth/me                                       current session context
///
/// /users/{id}                                    user profile
/// /users/{id}/notifications                      list (?unread_only, limit, offset)
/// /users/{id}/notifications/unread-count         count
/// /users/{id}/notifications/read-all             mark all read (POST)
/// /users/{id}/messages                           inbox
/// /users/{id}/messages/unread-count              count
///
/// /instructors                                   list, create
/// /instructors/{id}                              get
/// /instructors/{id}/dashboard                    dashboard (?date)
/// /instructors/{id}/session-requests             requests (?status)
/// /instructors/{id}/sessions                     therapy sessions
///
/// /session-requests                              list, create
/// /session-requests/{id}                         get
/// /session-requests/{id}/accept                  accept (POST)
/// /session-requests/{id}/decline                 decline (POST)
///
/// /clients/{id}/session-requests                 requests (?status)
/// /clients/{id}/sessions                         therapy sessions
/// /clients/{id}/dashboard                        dashboard (?date)
///
/// /sessions/{id}                                 get
/// /sessions/{id}/status                          update status (PUT)
/// /sessions/{id}/rating                          rate once (POST)
///
/// /notifications/{id}/read                       mark read (POST)
///
/// /messages                                      send (POST)
/// /messages/conversation                         conversation (?user_a, user_b)
/// /messages/{id}/read                            mark read (POST, ?user_id)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Users
        .route("/users/{id}", get(user::get_user))
        .route(
            "/users/{id}/notifications",
            get(notification::list_notifications),
        )
        .route(
            "/users/{id}/notifications/unread-count",
            get(notification::unread_count),
        )
        .route(
            "/users/{id}/notifications/read-all",
            post(notification::mark_all_read),
        )
        .route("/users/{id}/messages", get(message::inbox))
        .route(
            "/users/{id}/messages/unread-count",
            get(message::unread_count),
        )
        // Instructors
        .route(
            "/instructors",
            get(instructor::list_instructors).post(instructor::create_instructor),
        )
        .route("/instructors/{id}", get(instructor::get_instructor))
        .route(
            "/instructors/{id}/dashboard",
            get(dashboard::instructor_dashboard),
        )
        .route(
            "/instructors/{id}/session-requests",
            get(session_request::list_for_instructor),
        )
        .route(
            "/instructors/{id}/sessions",
            get(therapy_session::list_for_instructor),
        )
        // Session requests
        .route(
            "/session-requests",
            get(session_request::list_requests).post(session_request::create_request),
        )
        .route("/session-requests/{id}", get(session_request::get_request))
        .route(
            "/session-requests/{id}/accept",
            post(session_request::accept_request),
        )
        .route(
            "/session-requests/{id}/decline",
            post(session_request::decline_request),
        )
        // Clients
        .route(
            "/clients/{id}/session-requests",
            get(session_request::list_for_client),
        )
        .route(
            "/clients/{id}/sessions",
            get(therapy_session::list_for_client),
        )
        .route("/clients/{id}/dashboard", get(dashboard::client_dashboard))
        // Therapy sessions
        .route("/sessions/{id}", get(therapy_session::get_session))
        .route("/sessions/{id}/status", put(therapy_session::update_status))
        .route("/sessions/{id}/rating", post(therapy_session::rate_session))
        // Notifications
        .route("/notifications/{id}/read", post(notification::mark_read))
        // Messages
        .route("/messages", post(message::send_message))
        .route("/messages/conversation", get(message::conversation))
        .route("/messages/{id}/read", post(message::mark_read))
}
