//! Office floor views: the per-category layout and the management tree.

use std::collections::{BTreeMap, BTreeSet};

use diesel::prelude::*;

use crate::layout::{CATEGORY_SLOTS, ROWS_PER_COLUMN, organize_columns};
use crate::models::{
    CategoryLayout, IslandNode, ManagementTree, OfficeLayout, RoomNode, Sector, WorkstationDetails,
    WorkstationFilter,
};
use crate::orm::employee::list_unassigned_employees;
use crate::orm::island::list_islands;
use crate::orm::room::list_rooms;
use crate::orm::workstation::{insert_empty_slot, list_workstations, sequences_in_category};

/// Creates the missing workstations 1..=12 of every category.
///
/// Runs in one transaction and returns how many slots were created, so a
/// second call creates nothing.
pub fn ensure_category_slots(conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    conn.transaction(|conn| {
        let mut created = 0;
        for category in Sector::ALL {
            let existing: BTreeSet<i32> =
                sequences_in_category(conn, *category)?.into_iter().collect();
            for sequence in 1..=CATEGORY_SLOTS {
                if !existing.contains(&sequence) {
                    created += insert_empty_slot(conn, *category, sequence)?;
                }
            }
        }
        if created > 0 {
            info!("Created {} missing office workstation slot(s)", created);
        }
        Ok(created)
    })
}

/// Builds the office view: every category in display order with its
/// workstations sorted by sequence and split into reversed columns.
pub fn office_layout(conn: &mut SqliteConnection) -> Result<OfficeLayout, diesel::result::Error> {
    ensure_category_slots(conn)?;

    let mut categories = Vec::with_capacity(Sector::ALL.len());
    for category in Sector::ALL {
        let workstations = list_workstations(
            conn,
            &WorkstationFilter {
                category: Some(*category),
                ..Default::default()
            },
        )?;
        categories.push(CategoryLayout {
            category: *category,
            label: category.label().to_string(),
            columns: organize_columns(workstations, ROWS_PER_COLUMN),
        });
    }
    Ok(OfficeLayout { categories })
}

/// Rooms with their islands and workstations, plus what is not placed yet.
pub fn management_tree(conn: &mut SqliteConnection) -> Result<ManagementTree, diesel::result::Error> {
    let rooms = list_rooms(conn)?;
    let islands = list_islands(conn)?;
    let workstations = list_workstations(conn, &WorkstationFilter::default())?;
    let unassigned_employees = list_unassigned_employees(conn)?;

    let mut by_island: BTreeMap<i32, Vec<WorkstationDetails>> = BTreeMap::new();
    let mut unplaced_workstations = Vec::new();
    for details in workstations {
        match details.workstation.island_id {
            Some(island_id) => by_island.entry(island_id).or_default().push(details),
            None => unplaced_workstations.push(details),
        }
    }

    let mut islands_by_room: BTreeMap<i32, Vec<IslandNode>> = BTreeMap::new();
    for island in islands {
        let workstations = by_island.remove(&island.id).unwrap_or_default();
        islands_by_room
            .entry(island.room_id)
            .or_default()
            .push(IslandNode {
                island,
                workstations,
            });
    }

    let rooms = rooms
        .into_iter()
        .map(|room| RoomNode {
            islands: islands_by_room.remove(&room.id).unwrap_or_default(),
            room,
        })
        .collect();

    Ok(ManagementTree {
        rooms,
        unplaced_workstations,
        unassigned_employees,
    })
}
