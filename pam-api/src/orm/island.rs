use diesel::prelude::*;

use crate::error::PamError;
use crate::models::{
    ActionType, Actor, EntityType, Island, IslandInput, NewIsland, Room, Sector,
    UpdateIslandRequest,
};
use crate::orm::change_log::log_change;
use crate::orm::room::get_room;
use crate::orm::workstation::detach_island;

/// Label used in the change log, e.g. `Sala 101 - Ilha 2`.
pub fn island_label(room: &Room, island: &Island) -> String {
    format!("Sala {} - Ilha {}", room.name, island.island_number)
}

fn existing_room(conn: &mut SqliteConnection, room: i32) -> Result<Room, PamError> {
    get_room(conn, room)?
        .ok_or_else(|| PamError::Validation(format!("Room with ID {} does not exist", room)))
}

fn validate_island_number(number: i32) -> Result<(), PamError> {
    if number < 1 {
        return Err(PamError::Validation(
            "Island number must be positive".to_string(),
        ));
    }
    Ok(())
}

fn number_taken(
    conn: &mut SqliteConnection,
    room: i32,
    number: i32,
    except: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::islands::dsl::*;

    // Row ids start at 1, so 0 excludes nothing
    let count: i64 = islands
        .filter(room_id.eq(room))
        .filter(island_number.eq(number))
        .filter(id.ne(except.unwrap_or(0)))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Creates an island. Numbers are unique within a room and the category
/// defaults to ESTAGIO.
pub fn insert_island(
    conn: &mut SqliteConnection,
    input: IslandInput,
    actor: Option<&Actor>,
) -> Result<Island, PamError> {
    use crate::schema::islands::dsl::*;

    validate_island_number(input.island_number)?;

    conn.transaction(|conn| {
        let room = existing_room(conn, input.room_id)?;
        if number_taken(conn, room.id, input.island_number, None)? {
            return Err(PamError::Conflict(format!(
                "Island {} already exists in room '{}'",
                input.island_number, room.name
            )));
        }

        let new_island = NewIsland {
            room_id: room.id,
            island_number: input.island_number,
            category: input.category.unwrap_or(Sector::Estagio),
        };
        diesel::insert_into(islands).values(&new_island).execute(conn)?;
        let island = islands
            .order(id.desc())
            .select(Island::as_select())
            .first(conn)?;

        log_change(
            conn,
            actor,
            EntityType::Island,
            island.id,
            &island_label(&room, &island),
            ActionType::Create,
            format!("category {}", island.category.label()),
        )?;
        Ok(island)
    })
}

pub fn get_island(
    conn: &mut SqliteConnection,
    island_id: i32,
) -> Result<Option<Island>, diesel::result::Error> {
    use crate::schema::islands::dsl::*;
    islands
        .filter(id.eq(island_id))
        .select(Island::as_select())
        .first(conn)
        .optional()
}

/// All islands ordered by room and number.
pub fn list_islands(conn: &mut SqliteConnection) -> Result<Vec<Island>, diesel::result::Error> {
    use crate::schema::islands::dsl::*;
    islands
        .order((room_id.asc(), island_number.asc()))
        .select(Island::as_select())
        .load(conn)
}

pub fn list_islands_by_room(
    conn: &mut SqliteConnection,
    room: i32,
) -> Result<Vec<Island>, diesel::result::Error> {
    use crate::schema::islands::dsl::*;
    islands
        .filter(room_id.eq(room))
        .order(island_number.asc())
        .select(Island::as_select())
        .load(conn)
}

pub fn update_island(
    conn: &mut SqliteConnection,
    island_id: i32,
    request: UpdateIslandRequest,
    actor: Option<&Actor>,
) -> Result<Island, PamError> {
    use crate::schema::islands::dsl::*;

    if let Some(number) = request.island_number {
        validate_island_number(number)?;
    }

    conn.transaction(|conn| {
        let current =
            get_island(conn, island_id)?.ok_or_else(|| PamError::not_found("Island", island_id))?;

        let new_room = existing_room(conn, request.room_id.unwrap_or(current.room_id))?;
        let new_number = request.island_number.unwrap_or(current.island_number);
        let new_category = request.category.unwrap_or(current.category);

        if number_taken(conn, new_room.id, new_number, Some(island_id))? {
            return Err(PamError::Conflict(format!(
                "Island {} already exists in room '{}'",
                new_number, new_room.name
            )));
        }

        let mut notes = Vec::new();
        if new_room.id != current.room_id {
            notes.push(format!("room: {}", new_room.name));
        }
        if new_number != current.island_number {
            notes.push(format!("number: {} -> {}", current.island_number, new_number));
        }
        if new_category != current.category {
            notes.push(format!(
                "category: {} -> {}",
                current.category.label(),
                new_category.label()
            ));
        }

        diesel::update(islands.filter(id.eq(island_id)))
            .set((
                room_id.eq(new_room.id),
                island_number.eq(new_number),
                category.eq(new_category),
            ))
            .execute(conn)?;
        let island = islands
            .filter(id.eq(island_id))
            .select(Island::as_select())
            .first(conn)?;

        log_change(
            conn,
            actor,
            EntityType::Island,
            island.id,
            &island_label(&new_room, &island),
            ActionType::Update,
            notes.join("; "),
        )?;
        Ok(island)
    })
}

/// Deletes an island. Its workstations stay, without an island.
pub fn delete_island(
    conn: &mut SqliteConnection,
    island_id: i32,
    actor: Option<&Actor>,
) -> Result<(), PamError> {
    use crate::schema::islands::dsl::*;

    conn.transaction(|conn| {
        let island =
            get_island(conn, island_id)?.ok_or_else(|| PamError::not_found("Island", island_id))?;
        let room = get_room(conn, island.room_id)?;

        let detached = detach_island(conn, island_id, actor)?;
        diesel::delete(islands.filter(id.eq(island_id))).execute(conn)?;

        let entity_name = match &room {
            Some(r) => island_label(r, &island),
            None => format!("Ilha {}", island.island_number),
        };
        let description = if detached.is_empty() {
            String::new()
        } else {
            format!("{} workstation(s) left without island", detached.len())
        };
        log_change(
            conn,
            actor,
            EntityType::Island,
            island.id,
            &entity_name,
            ActionType::Delete,
            description,
        )?;
        Ok(())
    })
}
