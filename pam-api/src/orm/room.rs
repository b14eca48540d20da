use diesel::prelude::*;

use crate::error::PamError;
use crate::models::{ActionType, Actor, EntityType, NewRoom, Room, RoomInput};
use crate::orm::change_log::log_change;

fn validate_room_name(raw: &str) -> Result<String, PamError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PamError::Validation("Room name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Creates a room. Names are unique.
pub fn insert_room(
    conn: &mut SqliteConnection,
    input: RoomInput,
    actor: Option<&Actor>,
) -> Result<Room, PamError> {
    use crate::schema::rooms::dsl::*;

    let room_name = validate_room_name(&input.name)?;

    conn.transaction(|conn| {
        if get_room_by_name(conn, &room_name)?.is_some() {
            return Err(PamError::Conflict(format!(
                "Room with name '{}' already exists",
                room_name
            )));
        }

        diesel::insert_into(rooms)
            .values(&NewRoom { name: room_name })
            .execute(conn)?;
        let room = rooms.order(id.desc()).select(Room::as_select()).first(conn)?;

        log_change(
            conn,
            actor,
            EntityType::Room,
            room.id,
            &room.name,
            ActionType::Create,
            "",
        )?;
        Ok(room)
    })
}

pub fn get_room(
    conn: &mut SqliteConnection,
    room_id: i32,
) -> Result<Option<Room>, diesel::result::Error> {
    use crate::schema::rooms::dsl::*;
    rooms
        .filter(id.eq(room_id))
        .select(Room::as_select())
        .first(conn)
        .optional()
}

/// Gets a room by name, ignoring case.
///
/// SQLite's NOCASE collation only folds ASCII, so the comparison happens
/// here to cover accented names too.
pub fn get_room_by_name(
    conn: &mut SqliteConnection,
    room_name: &str,
) -> Result<Option<Room>, diesel::result::Error> {
    let wanted = room_name.trim().to_lowercase();
    Ok(list_rooms(conn)?
        .into_iter()
        .find(|room| room.name.to_lowercase() == wanted))
}

pub fn list_rooms(conn: &mut SqliteConnection) -> Result<Vec<Room>, diesel::result::Error> {
    use crate::schema::rooms::dsl::*;
    rooms.order(name.asc()).select(Room::as_select()).load(conn)
}

pub fn update_room(
    conn: &mut SqliteConnection,
    room_id: i32,
    input: RoomInput,
    actor: Option<&Actor>,
) -> Result<Room, PamError> {
    use crate::schema::rooms::dsl::*;

    let new_name = validate_room_name(&input.name)?;

    conn.transaction(|conn| {
        let current =
            get_room(conn, room_id)?.ok_or_else(|| PamError::not_found("Room", room_id))?;

        if let Some(other) = get_room_by_name(conn, &new_name)?
            && other.id != room_id
        {
            return Err(PamError::Conflict(format!(
                "Room with name '{}' already exists",
                new_name
            )));
        }

        diesel::update(rooms.filter(id.eq(room_id)))
            .set(name.eq(&new_name))
            .execute(conn)?;

        log_change(
            conn,
            actor,
            EntityType::Room,
            room_id,
            &new_name,
            ActionType::Update,
            format!("name: {} -> {}", current.name, new_name),
        )?;
        Ok(Room {
            id: room_id,
            name: new_name,
        })
    })
}

/// Deletes a room. Refused while the room still has islands.
pub fn delete_room(
    conn: &mut SqliteConnection,
    room_id: i32,
    actor: Option<&Actor>,
) -> Result<(), PamError> {
    use crate::schema::islands;
    use crate::schema::rooms::dsl::*;

    conn.transaction(|conn| {
        let room = get_room(conn, room_id)?.ok_or_else(|| PamError::not_found("Room", room_id))?;

        let island_count: i64 = islands::table
            .filter(islands::room_id.eq(room_id))
            .count()
            .get_result(conn)?;
        if island_count > 0 {
            return Err(PamError::Conflict(format!(
                "Room '{}' still has {} island(s)",
                room.name, island_count
            )));
        }

        diesel::delete(rooms.filter(id.eq(room_id))).execute(conn)?;
        log_change(
            conn,
            actor,
            EntityType::Room,
            room.id,
            &room.name,
            ActionType::Delete,
            "",
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IslandInput, Sector};
    use crate::orm::change_log::history_for;
    use crate::orm::island::{delete_island, insert_island};
    use crate::orm::testing::setup_test_db;

    fn room(conn: &mut SqliteConnection, room_name: &str) -> Room {
        insert_room(
            conn,
            RoomInput {
                name: room_name.to_string(),
            },
            None,
        )
        .expect("insert room")
    }

    #[test]
    fn test_insert_and_get_room() {
        let mut conn = setup_test_db();
        let created = room(&mut conn, " Sala Azul ");
        assert_eq!(created.name, "Sala Azul");

        let fetched = get_room(&mut conn, created.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Sala Azul");

        let by_name = get_room_by_name(&mut conn, "sala azul").unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
    }

    #[test]
    fn test_room_names_are_unique_ignoring_case() {
        let mut conn = setup_test_db();
        room(&mut conn, "101");
        room(&mut conn, "Sala A");

        let duplicate = insert_room(
            &mut conn,
            RoomInput {
                name: "sala a".to_string(),
            },
            None,
        );
        assert!(matches!(duplicate, Err(PamError::Conflict(_))));

        let blank = insert_room(
            &mut conn,
            RoomInput {
                name: " ".to_string(),
            },
            None,
        );
        assert!(matches!(blank, Err(PamError::Validation(_))));
    }

    #[test]
    fn test_room_names_unique_in_database() {
        use crate::models::NewRoom;
        use crate::schema::rooms;

        let mut conn = setup_test_db();
        room(&mut conn, "Sala A");

        // Writes that skip insert_room still hit the column collation
        let raw = diesel::insert_into(rooms::table)
            .values(&NewRoom {
                name: "SALA A".to_string(),
            })
            .execute(&mut conn);
        assert!(matches!(
            raw,
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            ))
        ));
    }

    #[test]
    fn test_accented_room_names_ignore_case() {
        let mut conn = setup_test_db();
        let created = room(&mut conn, "Sala Órion");

        let found = get_room_by_name(&mut conn, "SALA ÓRION").unwrap().unwrap();
        assert_eq!(found.id, created.id);

        let duplicate = insert_room(
            &mut conn,
            RoomInput {
                name: "sala órion".to_string(),
            },
            None,
        );
        assert!(matches!(duplicate, Err(PamError::Conflict(_))));
    }

    #[test]
    fn test_list_rooms_sorted() {
        let mut conn = setup_test_db();
        room(&mut conn, "B");
        room(&mut conn, "A");
        let names: Vec<String> = list_rooms(&mut conn).unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_update_room() {
        let mut conn = setup_test_db();
        let a = room(&mut conn, "A");
        room(&mut conn, "B");

        let renamed = update_room(&mut conn, a.id, RoomInput { name: "C".to_string() }, None)
            .unwrap();
        assert_eq!(renamed.name, "C");

        let clash = update_room(&mut conn, a.id, RoomInput { name: "b".to_string() }, None);
        assert!(matches!(clash, Err(PamError::Conflict(_))));

        // Renaming to its own name is allowed
        update_room(&mut conn, a.id, RoomInput { name: "c".to_string() }, None).unwrap();

        let missing = update_room(&mut conn, 99, RoomInput { name: "Z".to_string() }, None);
        assert!(matches!(missing, Err(PamError::NotFound(_))));
    }

    #[test]
    fn test_delete_room_refused_while_islands_exist() {
        let mut conn = setup_test_db();
        let r = room(&mut conn, "101");
        let island = insert_island(
            &mut conn,
            IslandInput {
                room_id: r.id,
                island_number: 1,
                category: Some(Sector::Inss),
            },
            None,
        )
        .unwrap();

        let refused = delete_room(&mut conn, r.id, None);
        assert!(matches!(refused, Err(PamError::Conflict(_))));
        assert!(get_room(&mut conn, r.id).unwrap().is_some());

        delete_island(&mut conn, island.id, None).unwrap();
        delete_room(&mut conn, r.id, None).unwrap();
        assert!(get_room(&mut conn, r.id).unwrap().is_none());

        let history = history_for(&mut conn, EntityType::Room, r.id).unwrap();
        let actions: Vec<ActionType> = history.iter().map(|h| h.action_type).collect();
        assert_eq!(actions, vec![ActionType::Create, ActionType::Delete]);
    }
}
