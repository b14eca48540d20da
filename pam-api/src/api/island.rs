//! API endpoints for island management.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, ListResponse, db_error, not_found, pam_error};
use crate::logged_json::LoggedJson;
use crate::models::{Island, IslandInput, UpdateIslandRequest};
use crate::orm::DbConn;
use crate::orm::island::{delete_island, get_island, insert_island, list_islands, update_island};
use crate::session_guards::{StaffUser, SuperUser};

/// List Islands endpoint.
///
/// - **URL:** `/api/1/Islands`
/// - **Method:** `GET`
/// - **Authorization:** staff or superuser
#[get("/1/Islands")]
pub async fn list_islands_endpoint(
    db: DbConn,
    _user: StaffUser,
) -> Result<Json<ListResponse<Island>>, ApiError> {
    db.run(list_islands)
        .await
        .map(|islands| Json(islands.into()))
        .map_err(|e| db_error("listing islands", e))
}

/// Create Island endpoint.
///
/// - **URL:** `/api/1/Islands`
/// - **Method:** `POST`
/// - **Authorization:** superuser
///
/// ```json
/// { "room_id": 1, "island_number": 2, "category": "INSS" }
/// ```
///
/// `category` defaults to `ESTAGIO`. The number must be positive and
/// unique within the room (409 otherwise); an unknown room answers 400.
#[post("/1/Islands", data = "<new_island>")]
pub async fn create_island(
    db: DbConn,
    new_island: LoggedJson<IslandInput>,
    user: SuperUser,
) -> Result<status::Created<Json<Island>>, ApiError> {
    let actor = user.actor();
    let input = new_island.into_inner();
    db.run(move |conn| insert_island(conn, input, Some(&actor)))
        .await
        .map(|island| {
            status::Created::new(format!("/api/1/Islands/{}", island.id)).body(Json(island))
        })
        .map_err(pam_error)
}

#[get("/1/Islands/<island_id>")]
pub async fn get_island_endpoint(
    db: DbConn,
    island_id: i32,
    _user: StaffUser,
) -> Result<Json<Island>, ApiError> {
    match db.run(move |conn| get_island(conn, island_id)).await {
        Ok(Some(island)) => Ok(Json(island)),
        Ok(None) => Err(not_found("Island", island_id)),
        Err(e) => Err(db_error("getting island", e)),
    }
}

/// Update Island endpoint.
///
/// - **URL:** `/api/1/Islands/<island_id>`
/// - **Method:** `PUT`
/// - **Authorization:** superuser
///
/// Every field is optional; moving an island to another room keeps the
/// number unique within the target room.
#[put("/1/Islands/<island_id>", data = "<update_data>")]
pub async fn update_island_endpoint(
    db: DbConn,
    island_id: i32,
    update_data: LoggedJson<UpdateIslandRequest>,
    user: SuperUser,
) -> Result<Json<Island>, ApiError> {
    let actor = user.actor();
    let request = update_data.into_inner();
    db.run(move |conn| update_island(conn, island_id, request, Some(&actor)))
        .await
        .map(Json)
        .map_err(pam_error)
}

/// Delete Island endpoint.
///
/// - **URL:** `/api/1/Islands/<island_id>`
/// - **Method:** `DELETE`
/// - **Authorization:** superuser
///
/// The island's workstations remain, without an island.
#[delete("/1/Islands/<island_id>")]
pub async fn delete_island_endpoint(
    db: DbConn,
    island_id: i32,
    user: SuperUser,
) -> Result<Status, ApiError> {
    let actor = user.actor();
    db.run(move |conn| delete_island(conn, island_id, Some(&actor)))
        .await
        .map(|()| Status::NoContent)
        .map_err(pam_error)
}

pub fn routes() -> Vec<Route> {
    routes![
        list_islands_endpoint,
        create_island,
        get_island_endpoint,
        update_island_endpoint,
        delete_island_endpoint
    ]
}
