//! API endpoints for rooms and the islands inside them.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, ListResponse, db_error, not_found, pam_error};
use crate::logged_json::LoggedJson;
use crate::models::{Island, Room, RoomInput};
use crate::orm::DbConn;
use crate::orm::island::list_islands_by_room;
use crate::orm::room::{delete_room, get_room, insert_room, list_rooms, update_room};
use crate::session_guards::{StaffUser, SuperUser};

/// List Rooms endpoint.
///
/// - **URL:** `/api/1/Rooms`
/// - **Method:** `GET`
/// - **Purpose:** All rooms ordered by name
/// - **Authorization:** staff or superuser
#[get("/1/Rooms")]
pub async fn list_rooms_endpoint(
    db: DbConn,
    _user: StaffUser,
) -> Result<Json<ListResponse<Room>>, ApiError> {
    db.run(list_rooms)
        .await
        .map(|rooms| Json(rooms.into()))
        .map_err(|e| db_error("listing rooms", e))
}

/// Create Room endpoint.
///
/// - **URL:** `/api/1/Rooms`
/// - **Method:** `POST`
/// - **Authorization:** superuser
///
/// ```json
/// { "name": "101" }
/// ```
///
/// Names are unique regardless of case; a duplicate answers 409 Conflict.
#[post("/1/Rooms", data = "<new_room>")]
pub async fn create_room(
    db: DbConn,
    new_room: LoggedJson<RoomInput>,
    user: SuperUser,
) -> Result<status::Created<Json<Room>>, ApiError> {
    let actor = user.actor();
    let input = new_room.into_inner();
    db.run(move |conn| insert_room(conn, input, Some(&actor)))
        .await
        .map(|room| status::Created::new(format!("/api/1/Rooms/{}", room.id)).body(Json(room)))
        .map_err(pam_error)
}

#[get("/1/Rooms/<room_id>")]
pub async fn get_room_endpoint(
    db: DbConn,
    room_id: i32,
    _user: StaffUser,
) -> Result<Json<Room>, ApiError> {
    match db.run(move |conn| get_room(conn, room_id)).await {
        Ok(Some(room)) => Ok(Json(room)),
        Ok(None) => Err(not_found("Room", room_id)),
        Err(e) => Err(db_error("getting room", e)),
    }
}

/// Rename Room endpoint.
///
/// - **URL:** `/api/1/Rooms/<room_id>`
/// - **Method:** `PUT`
/// - **Authorization:** superuser
#[put("/1/Rooms/<room_id>", data = "<update_data>")]
pub async fn update_room_endpoint(
    db: DbConn,
    room_id: i32,
    update_data: LoggedJson<RoomInput>,
    user: SuperUser,
) -> Result<Json<Room>, ApiError> {
    let actor = user.actor();
    let input = update_data.into_inner();
    db.run(move |conn| update_room(conn, room_id, input, Some(&actor)))
        .await
        .map(Json)
        .map_err(pam_error)
}

/// Delete Room endpoint.
///
/// - **URL:** `/api/1/Rooms/<room_id>`
/// - **Method:** `DELETE`
/// - **Authorization:** superuser
///
/// Refused with 409 Conflict while the room still has islands.
#[delete("/1/Rooms/<room_id>")]
pub async fn delete_room_endpoint(
    db: DbConn,
    room_id: i32,
    user: SuperUser,
) -> Result<Status, ApiError> {
    let actor = user.actor();
    db.run(move |conn| delete_room(conn, room_id, Some(&actor)))
        .await
        .map(|()| Status::NoContent)
        .map_err(pam_error)
}

/// Room Islands endpoint.
///
/// - **URL:** `/api/1/Rooms/<room_id>/Islands`
/// - **Method:** `GET`
/// - **Purpose:** Islands of one room ordered by number, for dependent
///   selects in editing forms
/// - **Authorization:** staff or superuser
#[get("/1/Rooms/<room_id>/Islands")]
pub async fn room_islands(
    db: DbConn,
    room_id: i32,
    _user: StaffUser,
) -> Result<Json<ListResponse<Island>>, ApiError> {
    db.run(move |conn| {
        if get_room(conn, room_id)
            .map_err(|e| db_error("getting room", e))?
            .is_none()
        {
            return Err(not_found("Room", room_id));
        }
        list_islands_by_room(conn, room_id)
            .map(|islands| Json(islands.into()))
            .map_err(|e| db_error("listing islands", e))
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        list_rooms_endpoint,
        create_room,
        get_room_endpoint,
        update_room_endpoint,
        delete_room_endpoint,
        room_islands
    ]
}
