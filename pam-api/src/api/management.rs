use rocket::Route;
use rocket::serde::json::Json;

use crate::api::{ApiError, db_error};
use crate::models::ManagementTree;
use crate::orm::DbConn;
use crate::orm::office::management_tree;
use crate::session_guards::SuperUser;

/// Management Tree endpoint.
///
/// - **URL:** `/api/1/management`
/// - **Method:** `GET`
/// - **Purpose:** Rooms with their islands and workstations, the
///   workstations without an island and the employees without a workstation
/// - **Authorization:** superuser
#[get("/1/management")]
pub async fn management_view(
    db: DbConn,
    _user: SuperUser,
) -> Result<Json<ManagementTree>, ApiError> {
    db.run(management_tree)
        .await
        .map(Json)
        .map_err(|e| db_error("building management tree", e))
}

pub fn routes() -> Vec<Route> {
    routes![management_view]
}
