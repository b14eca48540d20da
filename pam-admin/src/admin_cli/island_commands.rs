use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use pam_api::models::{Actor, Island, IslandInput, Sector};
use pam_api::orm::island::{delete_island, get_island, insert_island, island_label, list_islands, list_islands_by_room};
use pam_api::orm::room::get_room;

use crate::admin_cli::utils::{SearchTerm, confirm};

#[derive(Subcommand)]
pub enum IslandAction {
    #[command(about = "List islands, optionally filtered by search term or room")]
    Ls {
        #[arg(
            help = "Search term matched against \"Sala <room> - Ilha <n>\" (regex by default, use -F for fixed string)"
        )]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
        #[arg(short, long, help = "Room ID")]
        room: Option<i32>,
    },
    #[command(about = "Add an island to a room")]
    Add {
        #[arg(short, long, help = "Room ID")]
        room: i32,
        #[arg(short, long, help = "Island number, unique within the room")]
        number: i32,
        #[arg(short, long, help = "Sector (defaults to ESTAGIO)")]
        category: Option<Sector>,
    },
    #[command(about = "Remove an island; its workstations are kept without an island")]
    Rm {
        #[arg(help = "Island ID")]
        id: i32,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
}

pub fn handle_island_command_with_conn(
    conn: &mut SqliteConnection,
    action: IslandAction,
    actor: &Actor,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        IslandAction::Ls {
            search_term,
            fixed_string,
            room,
        } => {
            island_ls_impl(conn, search_term, fixed_string, room)?;
        }
        IslandAction::Add {
            room,
            number,
            category,
        } => {
            island_add_impl(conn, room, number, category, actor)?;
        }
        IslandAction::Rm { id, yes } => {
            island_rm_impl(conn, id, yes, actor)?;
        }
    }
    Ok(())
}

pub fn island_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
    room_id: Option<i32>,
) -> Result<Vec<Island>, Box<dyn std::error::Error>> {
    let term = SearchTerm::new(search_term, fixed_string)?;
    let islands = match room_id {
        Some(room) => {
            if get_room(conn, room)?.is_none() {
                return Err(format!("Room with ID {} does not exist", room).into());
            }
            list_islands_by_room(conn, room)?
        }
        None => list_islands(conn)?,
    };

    let mut labelled = Vec::with_capacity(islands.len());
    for island in islands {
        let label = match get_room(conn, island.room_id)? {
            Some(room) => island_label(&room, &island),
            None => format!("Ilha {}", island.island_number),
        };
        labelled.push((island, label));
    }
    let labelled = term.filter(labelled, |(_, label)| label.as_str());

    if labelled.is_empty() {
        println!("No islands found.");
        return Ok(Vec::new());
    }

    println!("Islands:");
    for (island, label) in &labelled {
        println!(
            "  ID: {}, {}, Category: {}",
            island.id,
            label,
            island.category.label()
        );
    }
    Ok(labelled.into_iter().map(|(island, _)| island).collect())
}

pub fn island_add_impl(
    conn: &mut SqliteConnection,
    room_id: i32,
    island_number: i32,
    category: Option<Sector>,
    actor: &Actor,
) -> Result<Island, Box<dyn std::error::Error>> {
    let island = insert_island(
        conn,
        IslandInput {
            room_id,
            island_number,
            category,
        },
        Some(actor),
    )?;

    println!("Island created successfully!");
    println!("ID: {}", island.id);
    println!("Room ID: {}", island.room_id);
    println!("Number: {}", island.island_number);
    println!("Category: {}", island.category.label());
    Ok(island)
}

pub fn island_rm_impl(
    conn: &mut SqliteConnection,
    island_id: i32,
    yes: bool,
    actor: &Actor,
) -> Result<bool, Box<dyn std::error::Error>> {
    let island = get_island(conn, island_id)?
        .ok_or_else(|| format!("Island with ID {} does not exist", island_id))?;

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete island {} (ID: {})?",
            island.island_number, island.id
        ))?
    {
        println!("Operation cancelled.");
        return Ok(false);
    }

    delete_island(conn, island_id, Some(actor))?;
    println!("Deleted island {} (ID: {})", island.island_number, island.id);
    Ok(true)
}
