//! API endpoints for workstations (PAs).
//!
//! # Authorization Rules
//! - staff and superuser roles can read workstations, toggle peripherals
//!   and submit batch updates
//! - only superusers can create, edit, or delete individual workstations
//!   through these endpoints

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::{ApiError, ListResponse, api_error, db_error, not_found, pam_error, parse_query};
use crate::logged_json::LoggedJson;
use crate::models::{
    EmployeePosition, Peripheral, Workstation, WorkstationBatchItem, WorkstationChanges,
    WorkstationDetails, WorkstationFilter, WorkstationInput, WorkstationStatus,
};
use crate::orm::DbConn;
use crate::orm::position_history::history_for_workstation;
use crate::orm::workstation::{
    apply_workstation_batch, delete_workstation, get_workstation, get_workstation_details,
    insert_workstation, list_workstations, save_workstation, toggle_peripheral,
};
use crate::session_guards::{StaffUser, SuperUser};

/// Edit of one workstation: a partial update plus an optional explicit
/// status. Without `status` the status is derived.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct WorkstationUpdate {
    #[serde(flatten)]
    pub changes: WorkstationChanges,
    pub status: Option<WorkstationStatus>,
}

/// List Workstations endpoint.
///
/// - **URL:** `/api/1/Workstations?status=&category=&room=&island=&search=`
/// - **Method:** `GET`
/// - **Purpose:** Workstations with employee, room and island names, ordered
///   by category and sequence
/// - **Authorization:** staff or superuser
///
/// `search` matches a case-insensitive substring of the employee name.
#[get("/1/Workstations?<status>&<category>&<room>&<island>&<search>")]
pub async fn list_workstations_endpoint(
    db: DbConn,
    status: Option<String>,
    category: Option<String>,
    room: Option<i32>,
    island: Option<i32>,
    search: Option<String>,
    _user: StaffUser,
) -> Result<Json<ListResponse<WorkstationDetails>>, ApiError> {
    let filter = WorkstationFilter {
        status: parse_query(status.as_deref())?,
        category: parse_query(category.as_deref())?,
        room_id: room,
        island_id: island,
        employee_search: search,
    };
    db.run(move |conn| list_workstations(conn, &filter))
        .await
        .map(|details| Json(details.into()))
        .map_err(|e| db_error("listing workstations", e))
}

/// Create Workstation endpoint.
///
/// - **URL:** `/api/1/Workstations`
/// - **Method:** `POST`
/// - **Authorization:** superuser
///
/// ```json
/// { "category": "INSS", "island_id": 3, "employee_id": 7, "headset": false }
/// ```
///
/// The sequence is the next free number in the category and the status is
/// derived from the assignment and the peripherals.
#[post("/1/Workstations", data = "<new_workstation>")]
pub async fn create_workstation(
    db: DbConn,
    new_workstation: LoggedJson<WorkstationInput>,
    user: SuperUser,
) -> Result<status::Created<Json<Workstation>>, ApiError> {
    let actor = user.actor();
    let input = new_workstation.into_inner();
    db.run(move |conn| insert_workstation(conn, input, Some(&actor)))
        .await
        .map(|ws| status::Created::new(format!("/api/1/Workstations/{}", ws.id)).body(Json(ws)))
        .map_err(pam_error)
}

#[get("/1/Workstations/<workstation_id>")]
pub async fn get_workstation_endpoint(
    db: DbConn,
    workstation_id: i32,
    _user: StaffUser,
) -> Result<Json<WorkstationDetails>, ApiError> {
    match db.run(move |conn| get_workstation_details(conn, workstation_id)).await {
        Ok(Some(details)) => Ok(Json(details)),
        Ok(None) => Err(not_found("Workstation", workstation_id)),
        Err(e) => Err(db_error("getting workstation", e)),
    }
}

/// Update Workstation endpoint.
///
/// - **URL:** `/api/1/Workstations/<workstation_id>`
/// - **Method:** `PUT`
/// - **Authorization:** superuser
///
/// ```json
/// { "employee_id": null, "mouse": true, "status": "MAINTENANCE" }
/// ```
///
/// Missing keys are left untouched and `null` clears a reference. An
/// explicit `status` overrides the derivation: `UNOCCUPIED` releases the
/// employee and `OCCUPIED` without an employee answers 400.
#[put("/1/Workstations/<workstation_id>", data = "<update_data>")]
pub async fn update_workstation_endpoint(
    db: DbConn,
    workstation_id: i32,
    update_data: LoggedJson<WorkstationUpdate>,
    user: SuperUser,
) -> Result<Json<Workstation>, ApiError> {
    let actor = user.actor();
    let update = update_data.into_inner();
    db.run(move |conn| {
        save_workstation(
            conn,
            workstation_id,
            update.changes,
            update.status,
            Some(&actor),
        )
    })
    .await
    .map(Json)
    .map_err(pam_error)
}

/// Batch Update endpoint.
///
/// - **URL:** `/api/1/Workstations`
/// - **Method:** `PUT`
/// - **Authorization:** staff or superuser
///
/// ```json
/// [
///   { "id": 1, "employee_id": 4 },
///   { "id": 2, "employee_id": null, "status": "UNOCCUPIED" }
/// ]
/// ```
///
/// All items are applied in one transaction; if any item fails nothing is
/// saved.
#[put("/1/Workstations", data = "<items>")]
pub async fn batch_update_workstations(
    db: DbConn,
    items: LoggedJson<Vec<WorkstationBatchItem>>,
    user: StaffUser,
) -> Result<Json<ListResponse<Workstation>>, ApiError> {
    let actor = user.actor();
    let items = items.into_inner();
    let count = items.len();
    let saved = db
        .run(move |conn| apply_workstation_batch(conn, items, Some(&actor)))
        .await
        .map_err(pam_error)?;
    info!("Applied batch update of {} workstation(s)", count);
    Ok(Json(saved.into()))
}

/// Toggle Peripheral endpoint.
///
/// - **URL:** `/api/1/Workstations/<workstation_id>/toggle/<peripheral>`
/// - **Method:** `POST`
/// - **Authorization:** staff or superuser
///
/// `peripheral` is one of `monitor`, `keyboard`, `mouse`, `mousepad`,
/// `headset`. The status is derived again afterwards, so removing a core
/// peripheral from an occupied workstation puts it in maintenance.
#[post("/1/Workstations/<workstation_id>/toggle/<peripheral>")]
pub async fn toggle_peripheral_endpoint(
    db: DbConn,
    workstation_id: i32,
    peripheral: &str,
    user: StaffUser,
) -> Result<Json<Workstation>, ApiError> {
    let peripheral: Peripheral = peripheral
        .parse()
        .map_err(|e: String| api_error(Status::BadRequest, e))?;
    let actor = user.actor();
    db.run(move |conn| toggle_peripheral(conn, workstation_id, peripheral, Some(&actor)))
        .await
        .map(Json)
        .map_err(pam_error)
}

/// Delete Workstation endpoint.
///
/// - **URL:** `/api/1/Workstations/<workstation_id>`
/// - **Method:** `DELETE`
/// - **Authorization:** superuser
#[delete("/1/Workstations/<workstation_id>")]
pub async fn delete_workstation_endpoint(
    db: DbConn,
    workstation_id: i32,
    user: SuperUser,
) -> Result<Status, ApiError> {
    let actor = user.actor();
    db.run(move |conn| delete_workstation(conn, workstation_id, Some(&actor)))
        .await
        .map(|()| Status::NoContent)
        .map_err(pam_error)
}

/// Workstation Position History endpoint.
///
/// - **URL:** `/api/1/Workstations/<workstation_id>/PositionHistory`
/// - **Method:** `GET`
/// - **Purpose:** Employees who occupied the workstation, newest first
/// - **Authorization:** staff or superuser
#[get("/1/Workstations/<workstation_id>/PositionHistory")]
pub async fn workstation_position_history(
    db: DbConn,
    workstation_id: i32,
    _user: StaffUser,
) -> Result<Json<ListResponse<EmployeePosition>>, ApiError> {
    db.run(move |conn| {
        if get_workstation(conn, workstation_id)
            .map_err(|e| db_error("getting workstation", e))?
            .is_none()
        {
            return Err(not_found("Workstation", workstation_id));
        }
        history_for_workstation(conn, workstation_id)
            .map(|history| Json(history.into()))
            .map_err(|e| db_error("loading position history", e))
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        list_workstations_endpoint,
        create_workstation,
        get_workstation_endpoint,
        update_workstation_endpoint,
        batch_update_workstations,
        toggle_peripheral_endpoint,
        delete_workstation_endpoint,
        workstation_position_history
    ]
}
