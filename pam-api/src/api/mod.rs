pub mod change_log;
pub mod employee;
pub mod island;
pub mod login;
pub mod logout;
pub mod management;
pub mod office;
pub mod room;
pub mod status;
pub mod workstation;

use std::str::FromStr;

use rocket::Route;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::PamError;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Collection body: `{"value": [...]}`.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ListResponse<T> {
    pub value: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(value: Vec<T>) -> Self {
        ListResponse { value }
    }
}

pub type ApiError = Custom<Json<ErrorResponse>>;

pub fn api_error(status: Status, message: impl Into<String>) -> ApiError {
    Custom(
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Converts a domain error into its HTTP response. Server-side failures are
/// logged and reported without details.
pub fn pam_error(err: PamError) -> ApiError {
    match err {
        PamError::Database(e) => {
            error!("Database error: {:?}", e);
            api_error(Status::InternalServerError, "Internal server error")
        }
        other => api_error(other.status(), other.to_string()),
    }
}

/// Logs a failed query and reports a 500.
pub fn db_error(context: &str, err: diesel::result::Error) -> ApiError {
    error!("Error {}: {:?}", context, err);
    api_error(
        Status::InternalServerError,
        format!("Internal server error while {}", context),
    )
}

pub fn not_found(what: &str, id: i32) -> ApiError {
    api_error(
        Status::NotFound,
        format!("{} with ID {} not found", what, id),
    )
}

/// Parses an optional query parameter, rejecting unknown codes with a 400.
pub fn parse_query<T>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = String>,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|e| api_error(Status::BadRequest, e)),
        None => Ok(None),
    }
}

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(change_log::routes());
    routes.extend(employee::routes());
    routes.extend(island::routes());
    routes.extend(login::routes());
    routes.extend(logout::routes());
    routes.extend(management::routes());
    routes.extend(office::routes());
    routes.extend(room::routes());
    routes.extend(status::routes());
    routes.extend(workstation::routes());
    routes
}
