//! Office floor endpoints: the public board and the staff editing view.

use rocket::http::Header;
use rocket::{Responder, Route};
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::workstation::WorkstationUpdate;
use crate::api::{ApiError, db_error, not_found, pam_error};
use crate::logged_json::LoggedJson;
use crate::models::{Employee, EmployeeFilter, OfficeLayout, WorkstationDetails};
use crate::orm::DbConn;
use crate::orm::employee::list_employees;
use crate::orm::office::office_layout;
use crate::orm::workstation::{get_workstation_details, save_workstation};
use crate::session_guards::StaffUser;

/// The layout plus the choices needed to edit it.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminOfficeView {
    pub layout: OfficeLayout,
    /// Every employee, ordered by name, for the assignment selects.
    pub employees: Vec<Employee>,
}

fn no_store() -> Header<'static> {
    Header::new("Cache-Control", "no-store")
}

#[derive(Responder)]
pub struct OfficeResponse {
    inner: Json<OfficeLayout>,
    cache_control: Header<'static>,
}

#[derive(Responder)]
pub struct AdminOfficeResponse {
    inner: Json<AdminOfficeView>,
    cache_control: Header<'static>,
}

/// Office View endpoint.
///
/// - **URL:** `/api/1/office`
/// - **Method:** `GET`
/// - **Purpose:** Every category (INSS, SIAPE Leo, SIAPE Dion, Estágio) with
///   its workstations split into columns of six, each column bottom-up
/// - **Authentication:** None required
///
/// Missing workstations 1 to 12 of each category are created first. The
/// response carries `Cache-Control: no-store`.
///
/// ```json
/// {
///   "categories": [
///     {
///       "category": "INSS",
///       "label": "INSS",
///       "columns": [[{ "workstation": { "sequence": 6, ... }, ... }, ...], [...]]
///     }
///   ]
/// }
/// ```
#[get("/1/office")]
pub async fn office_view(db: DbConn) -> Result<OfficeResponse, ApiError> {
    let layout = db
        .run(office_layout)
        .await
        .map_err(|e| db_error("building office layout", e))?;
    Ok(OfficeResponse {
        inner: Json(layout),
        cache_control: no_store(),
    })
}

/// Office Admin View endpoint.
///
/// - **URL:** `/api/1/office/admin`
/// - **Method:** `GET`
/// - **Purpose:** The office layout plus the employee list for editing
/// - **Authorization:** staff or superuser
#[get("/1/office/admin")]
pub async fn office_admin_view(
    db: DbConn,
    _user: StaffUser,
) -> Result<AdminOfficeResponse, ApiError> {
    let view = db
        .run(|conn| {
            let layout = office_layout(conn)?;
            let employees = list_employees(conn, &EmployeeFilter::default())?;
            Ok::<_, diesel::result::Error>(AdminOfficeView { layout, employees })
        })
        .await
        .map_err(|e| db_error("building office admin view", e))?;
    Ok(AdminOfficeResponse {
        inner: Json(view),
        cache_control: no_store(),
    })
}

/// Office Edit endpoint.
///
/// - **URL:** `/api/1/office/workstations/<workstation_id>`
/// - **Method:** `POST`
/// - **Purpose:** Saves the office form for one workstation
/// - **Authorization:** staff or superuser
///
/// ```json
/// { "employee_id": 12, "monitor": true, "keyboard": false, "status": null }
/// ```
///
/// Without `status` the status is derived; with it the administrator's
/// choice wins. Returns the workstation as shown on the board.
#[post("/1/office/workstations/<workstation_id>", data = "<form>")]
pub async fn office_save_workstation(
    db: DbConn,
    workstation_id: i32,
    form: LoggedJson<WorkstationUpdate>,
    user: StaffUser,
) -> Result<Json<WorkstationDetails>, ApiError> {
    let actor = user.actor();
    let update = form.into_inner();
    db.run(move |conn| {
        save_workstation(
            conn,
            workstation_id,
            update.changes,
            update.status,
            Some(&actor),
        )
        .map_err(pam_error)?;
        match get_workstation_details(conn, workstation_id) {
            Ok(Some(details)) => Ok(Json(details)),
            Ok(None) => Err(not_found("Workstation", workstation_id)),
            Err(e) => Err(db_error("loading workstation", e)),
        }
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![office_view, office_admin_view, office_save_workstation]
}
