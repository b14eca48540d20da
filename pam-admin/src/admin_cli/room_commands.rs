use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use pam_api::models::{Actor, Room, RoomInput};
use pam_api::orm::island::list_islands_by_room;
use pam_api::orm::room::{delete_room, get_room_by_name, insert_room, list_rooms};

use crate::admin_cli::utils::{SearchTerm, confirm};

#[derive(Subcommand)]
pub enum RoomAction {
    #[command(about = "List rooms, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
    #[command(about = "Add a new room")]
    Add {
        #[arg(short, long, help = "Room name")]
        name: String,
    },
    #[command(about = "Remove rooms matching search term")]
    Rm {
        #[arg(
            help = "Search term to match rooms for removal (regex by default, use -F for fixed string)"
        )]
        search_term: String,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
}

pub fn handle_room_command_with_conn(
    conn: &mut SqliteConnection,
    action: RoomAction,
    actor: &Actor,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RoomAction::Ls {
            search_term,
            fixed_string,
        } => {
            room_ls_impl(conn, search_term, fixed_string)?;
        }
        RoomAction::Add { name } => {
            room_add_impl(conn, name, actor)?;
        }
        RoomAction::Rm {
            search_term,
            fixed_string,
            yes,
        } => {
            room_rm_impl(conn, search_term, fixed_string, yes, actor)?;
        }
    }
    Ok(())
}

pub fn room_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let term = SearchTerm::new(search_term, fixed_string)?;
    let rooms = term.filter(list_rooms(conn)?, |r| r.name.as_str());

    if rooms.is_empty() {
        println!("No rooms found.");
        return Ok(());
    }

    println!("Rooms:");
    for room in rooms {
        let islands = list_islands_by_room(conn, room.id)?;
        println!(
            "  ID: {}, Name: {}, Islands: {}",
            room.id,
            room.name,
            islands.len()
        );
    }
    Ok(())
}

pub fn room_add_impl(
    conn: &mut SqliteConnection,
    name: String,
    actor: &Actor,
) -> Result<Room, Box<dyn std::error::Error>> {
    if let Some(existing) = get_room_by_name(conn, name.trim())? {
        println!("Room already exists!");
        println!("ID: {}", existing.id);
        println!("Name: {}", existing.name);
        return Ok(existing);
    }

    let room = insert_room(conn, RoomInput { name }, Some(actor))?;
    println!("Room created successfully!");
    println!("ID: {}", room.id);
    println!("Name: {}", room.name);
    Ok(room)
}

pub fn room_rm_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
    actor: &Actor,
) -> Result<usize, Box<dyn std::error::Error>> {
    let term = SearchTerm::new(Some(search_term), fixed_string)?;
    let rooms = term.filter(list_rooms(conn)?, |r| r.name.as_str());

    if rooms.is_empty() {
        println!("No rooms found matching the search term.");
        return Ok(0);
    }

    println!("Found {} room(s) matching the search term:", rooms.len());
    for room in &rooms {
        println!("  ID: {}, Name: {}", room.id, room.name);
    }

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete these {} room(s)?",
            rooms.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    let mut errors = Vec::new();
    for room in rooms {
        match delete_room(conn, room.id, Some(actor)) {
            Ok(()) => {
                deleted_count += 1;
                println!("Deleted room: {} (ID: {})", room.name, room.id);
            }
            Err(e) => errors.push(format!(
                "Failed to delete room {} (ID: {}): {}",
                room.name, room.id, e
            )),
        }
    }

    println!("Successfully deleted {} room(s).", deleted_count);
    if !errors.is_empty() {
        println!("Errors encountered:");
        for error in errors {
            println!("  {}", error);
        }
        return Err("Some deletions failed".into());
    }
    Ok(deleted_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pam_api::models::IslandInput;
    use pam_api::orm::island::insert_island;
    use pam_api::orm::testing::setup_test_db;

    fn actor() -> Actor {
        Actor::system("tester@pam-admin")
    }

    #[test]
    fn test_add_room_is_idempotent() {
        let mut conn = setup_test_db();
        let first = room_add_impl(&mut conn, "Sala 1".to_string(), &actor()).unwrap();
        let second = room_add_impl(&mut conn, " sala 1 ".to_string(), &actor()).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(list_rooms(&mut conn).unwrap().len(), 1);
    }

    #[test]
    fn test_rm_skips_rooms_with_islands() {
        let mut conn = setup_test_db();
        let busy = room_add_impl(&mut conn, "101".to_string(), &actor()).unwrap();
        room_add_impl(&mut conn, "102".to_string(), &actor()).unwrap();
        insert_island(
            &mut conn,
            IslandInput {
                room_id: busy.id,
                island_number: 1,
                category: None,
            },
            None,
        )
        .unwrap();

        let result = room_rm_impl(&mut conn, "^10".to_string(), false, true, &actor());
        assert!(result.is_err());

        let names: Vec<String> = list_rooms(&mut conn)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["101"]);
    }

    #[test]
    fn test_ls_with_invalid_regex() {
        let mut conn = setup_test_db();
        assert!(room_ls_impl(&mut conn, Some("[".to_string()), false).is_err());
        assert!(room_ls_impl(&mut conn, Some("[".to_string()), true).is_ok());
    }
}
