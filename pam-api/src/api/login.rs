//! API endpoints for user login and authentication.
//!
//! Login exchanges a username and password for a session cookie; `hello`
//! reports who the cookie belongs to.

use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use rocket::{Route, get, post};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::DbConn;
use crate::api::{ApiError, api_error};
use crate::models::User;
use crate::orm::login::process_login;
use crate::orm::user_role::get_user_roles;
use crate::session_guards::AuthenticatedUser;

/// Login request structure containing user credentials.
#[derive(Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Who is logged in. Returned by both login and hello.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginSuccessResponse {
    pub user_id: i32,
    pub username: String,
    pub roles: Vec<String>,
}

async fn build_user_response(db: &DbConn, user: User) -> LoginSuccessResponse {
    let user_id = user.id;
    let roles = match db.run(move |conn| get_user_roles(conn, user_id)).await {
        Ok(user_roles) => user_roles.into_iter().map(|role| role.name).collect(),
        Err(e) => {
            warn!("Could not load roles for user {}: {:?}", user_id, e);
            vec![]
        }
    };

    LoginSuccessResponse {
        user_id: user.id,
        username: user.username,
        roles,
    }
}

/// Login endpoint that authenticates users and creates sessions.
///
/// - **URL:** `/api/1/login`
/// - **Method:** `POST`
/// - **Purpose:** Authenticates a user and sets the session cookie
/// - **Authentication:** None required
///
/// # Request Format
///
/// ```json
/// { "username": "joana", "password": "secret" }
/// ```
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// { "user_id": 2, "username": "joana", "roles": ["staff"] }
/// ```
///
/// **Failure (HTTP 401 Unauthorized):**
/// ```json
/// { "error": "Invalid credentials" }
/// ```
///
/// Empty credentials are rejected with 400. The request body is not logged.
#[post("/1/login", data = "<login>")]
pub async fn login(
    db: DbConn,
    cookies: &CookieJar<'_>,
    login: Json<LoginRequest>,
) -> Result<Json<LoginSuccessResponse>, ApiError> {
    match process_login(&db, cookies, &login).await {
        Ok(user) => {
            info!("User '{}' logged in", user.username);
            Ok(Json(build_user_response(&db, user).await))
        }
        Err(status) if status == Status::BadRequest => Err(api_error(
            Status::BadRequest,
            "Username and password are required",
        )),
        Err(status) if status == Status::Unauthorized => {
            warn!("Failed login attempt for '{}'", login.username.trim());
            Err(api_error(Status::Unauthorized, "Invalid credentials"))
        }
        Err(status) => Err(api_error(status, "Internal server error")),
    }
}

/// Hello (Authentication Check) endpoint.
///
/// - **URL:** `/api/1/hello`
/// - **Method:** `GET`
/// - **Purpose:** Returns the logged in user; useful for checking the session
/// - **Authentication:** Required
///
/// Answers 401 when the session cookie is missing, revoked or expired.
#[get("/1/hello")]
pub async fn secure_hello(auth_user: AuthenticatedUser, db: DbConn) -> Json<LoginSuccessResponse> {
    Json(build_user_response(&db, auth_user.user).await)
}

pub fn routes() -> Vec<Route> {
    routes![login, secure_hello]
}
