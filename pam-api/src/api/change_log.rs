//! Audit log listing.

use rocket::Route;
use rocket::http::Status;
use rocket::serde::json::Json;

use crate::api::{ApiError, ListResponse, api_error, db_error, parse_query};
use crate::models::{ChangeLog, ChangeLogFilter};
use crate::orm::DbConn;
use crate::orm::change_log::list_changes;
use crate::session_guards::SuperUser;

/// List Change Logs endpoint.
///
/// - **URL:** `/api/1/ChangeLogs?entity_type=&entity_id=&action=&user_id=&limit=`
/// - **Method:** `GET`
/// - **Purpose:** Audit entries, newest first
/// - **Authorization:** superuser
///
/// `entity_type` is one of `EMPLOYEE`, `ROOM`, `ISLAND`, `WORKSTATION` and
/// `action` one of `CREATE`, `UPDATE`, `DELETE`. `limit` defaults to 100;
/// values below 1 answer 400.
///
/// ```json
/// {
///   "value": [
///     {
///       "id": 41,
///       "user_id": 1,
///       "username": "admin",
///       "entity_type": "WORKSTATION",
///       "entity_id": 3,
///       "entity_name": "PA INSS-3 - Maria Souza",
///       "action_type": "UPDATE",
///       "description": "employee: Maria Souza; status: UNOCCUPIED -> OCCUPIED",
///       "timestamp": "2025-04-02T13:05:11"
///     }
///   ]
/// }
/// ```
#[get("/1/ChangeLogs?<entity_type>&<entity_id>&<action>&<user_id>&<limit>")]
pub async fn list_change_logs(
    db: DbConn,
    entity_type: Option<String>,
    entity_id: Option<i32>,
    action: Option<String>,
    user_id: Option<i32>,
    limit: Option<i64>,
    _user: SuperUser,
) -> Result<Json<ListResponse<ChangeLog>>, ApiError> {
    if let Some(limit) = limit
        && limit < 1
    {
        return Err(api_error(
            Status::BadRequest,
            format!("Invalid limit {}: must be at least 1", limit),
        ));
    }
    let filter = ChangeLogFilter {
        entity_type: parse_query(entity_type.as_deref())?,
        entity_id,
        action_type: parse_query(action.as_deref())?,
        user_id,
        limit,
    };
    db.run(move |conn| list_changes(conn, &filter))
        .await
        .map(|changes| Json(changes.into()))
        .map_err(|e| db_error("listing change logs", e))
}

pub fn routes() -> Vec<Route> {
    routes![list_change_logs]
}
