//! API endpoints for employee management.
//!
//! # Authorization Rules
//! - staff and superuser roles can list and read employees
//! - only superusers can create, update or delete them

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, ListResponse, db_error, not_found, pam_error, parse_query};
use crate::logged_json::LoggedJson;
use crate::models::{Employee, EmployeeFilter, EmployeeInput, EmployeePosition, UpdateEmployeeRequest};
use crate::orm::DbConn;
use crate::orm::employee::{
    delete_employee, get_employee, insert_employee, list_employees, update_employee,
};
use crate::orm::position_history::history_for_employee;
use crate::session_guards::{StaffUser, SuperUser};

/// List Employees endpoint.
///
/// - **URL:** `/api/1/Employees?search=<text>&sector=<SECTOR>`
/// - **Method:** `GET`
/// - **Purpose:** Lists employees ordered by name
/// - **Authentication:** Required
/// - **Authorization:** staff or superuser
///
/// `search` matches a case-insensitive substring of the name; `sector` is
/// one of `INSS`, `SIAPE_LEO`, `SIAPE_DION`, `ESTAGIO`.
#[get("/1/Employees?<search>&<sector>")]
pub async fn list_employees_endpoint(
    db: DbConn,
    search: Option<String>,
    sector: Option<String>,
    _user: StaffUser,
) -> Result<Json<ListResponse<Employee>>, ApiError> {
    let filter = EmployeeFilter {
        search,
        sector: parse_query(sector.as_deref())?,
    };
    db.run(move |conn| list_employees(conn, &filter))
        .await
        .map(|employees| Json(employees.into()))
        .map_err(|e| db_error("listing employees", e))
}

/// Create Employee endpoint.
///
/// - **URL:** `/api/1/Employees`
/// - **Method:** `POST`
/// - **Authorization:** superuser
///
/// ```json
/// { "name": "Maria Souza", "sector": "SIAPE_LEO" }
/// ```
///
/// `sector` defaults to `INSS`. Answers 201 with the created employee, or
/// 400 when the name is empty or longer than 100 characters.
#[post("/1/Employees", data = "<new_employee>")]
pub async fn create_employee(
    db: DbConn,
    new_employee: LoggedJson<EmployeeInput>,
    user: SuperUser,
) -> Result<status::Created<Json<Employee>>, ApiError> {
    let actor = user.actor();
    let input = new_employee.into_inner();
    db.run(move |conn| insert_employee(conn, input, Some(&actor)))
        .await
        .map(|employee| {
            status::Created::new(format!("/api/1/Employees/{}", employee.id)).body(Json(employee))
        })
        .map_err(pam_error)
}

/// Get Employee endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>`
/// - **Method:** `GET`
/// - **Authorization:** staff or superuser
#[get("/1/Employees/<employee_id>")]
pub async fn get_employee_endpoint(
    db: DbConn,
    employee_id: i32,
    _user: StaffUser,
) -> Result<Json<Employee>, ApiError> {
    match db.run(move |conn| get_employee(conn, employee_id)).await {
        Ok(Some(employee)) => Ok(Json(employee)),
        Ok(None) => Err(not_found("Employee", employee_id)),
        Err(e) => Err(db_error("getting employee", e)),
    }
}

/// Update Employee endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>`
/// - **Method:** `PUT`
/// - **Authorization:** superuser
///
/// Every field is optional:
///
/// ```json
/// { "name": "Maria S. Souza", "sector": "INSS" }
/// ```
#[put("/1/Employees/<employee_id>", data = "<update_data>")]
pub async fn update_employee_endpoint(
    db: DbConn,
    employee_id: i32,
    update_data: LoggedJson<UpdateEmployeeRequest>,
    user: SuperUser,
) -> Result<Json<Employee>, ApiError> {
    let actor = user.actor();
    let request = update_data.into_inner();
    db.run(move |conn| update_employee(conn, employee_id, request, Some(&actor)))
        .await
        .map(Json)
        .map_err(pam_error)
}

/// Delete Employee endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>`
/// - **Method:** `DELETE`
/// - **Authorization:** superuser
///
/// The employee's workstations are released and become `UNOCCUPIED`.
/// Answers 204 No Content.
#[delete("/1/Employees/<employee_id>")]
pub async fn delete_employee_endpoint(
    db: DbConn,
    employee_id: i32,
    user: SuperUser,
) -> Result<Status, ApiError> {
    let actor = user.actor();
    db.run(move |conn| delete_employee(conn, employee_id, Some(&actor)))
        .await
        .map(|()| Status::NoContent)
        .map_err(pam_error)
}

/// Employee Position History endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>/PositionHistory`
/// - **Method:** `GET`
/// - **Purpose:** Workstations the employee has occupied, newest first
/// - **Authorization:** staff or superuser
#[get("/1/Employees/<employee_id>/PositionHistory")]
pub async fn employee_position_history(
    db: DbConn,
    employee_id: i32,
    _user: StaffUser,
) -> Result<Json<ListResponse<EmployeePosition>>, ApiError> {
    db.run(move |conn| {
        if get_employee(conn, employee_id)
            .map_err(|e| db_error("getting employee", e))?
            .is_none()
        {
            return Err(not_found("Employee", employee_id));
        }
        history_for_employee(conn, employee_id)
            .map(|history| Json(history.into()))
            .map_err(|e| db_error("loading position history", e))
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        list_employees_endpoint,
        create_employee,
        get_employee_endpoint,
        update_employee_endpoint,
        delete_employee_endpoint,
        employee_position_history
    ]
}
