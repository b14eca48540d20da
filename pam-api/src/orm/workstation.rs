//! Workstation persistence.
//!
//! Every save goes through [`save_workstation`], which applies the changes,
//! settles the status, keeps the position history and the employee's sector
//! in step with the assignment and writes the change log row.

use chrono::Utc;
use diesel::dsl::max;
use diesel::prelude::*;

use crate::error::PamError;
use crate::models::{
    ActionType, Actor, EntityType, NewWorkstation, Peripheral, Sector, Workstation,
    WorkstationBatchItem, WorkstationChanges, WorkstationDetails, WorkstationFilter,
    WorkstationInput, WorkstationStatus,
};
use crate::orm::{LIKE_ESCAPE, contains_pattern};
use crate::orm::change_log::log_change;
use crate::orm::employee::{get_employee, sync_employee_sector};
use crate::orm::island::get_island;
use crate::orm::position_history::{delete_history_for_workstation, record_assignment_change};
use crate::status::{Peripherals, apply_status_override, derive_status};

/// Next free sequence number of a category: one past the highest in use.
pub fn next_sequence(
    conn: &mut SqliteConnection,
    cat: Sector,
) -> Result<i32, diesel::result::Error> {
    use crate::schema::workstations::dsl::*;

    let highest: Option<i32> = workstations
        .filter(category.eq(cat))
        .select(max(sequence))
        .first(conn)?;
    Ok(highest.unwrap_or(0) + 1)
}

fn employee_name(
    conn: &mut SqliteConnection,
    employee: Option<i32>,
) -> Result<Option<String>, diesel::result::Error> {
    match employee {
        Some(eid) => Ok(get_employee(conn, eid)?.map(|e| e.name)),
        None => Ok(None),
    }
}

fn ensure_employee_exists(conn: &mut SqliteConnection, employee: i32) -> Result<(), PamError> {
    match get_employee(conn, employee)? {
        Some(_) => Ok(()),
        None => Err(PamError::Validation(format!(
            "Employee with ID {} does not exist",
            employee
        ))),
    }
}

fn ensure_island_exists(conn: &mut SqliteConnection, island: i32) -> Result<(), PamError> {
    match get_island(conn, island)? {
        Some(_) => Ok(()),
        None => Err(PamError::Validation(format!(
            "Island with ID {} does not exist",
            island
        ))),
    }
}

/// Creates a workstation with the next sequence of its category.
///
/// The category defaults to ESTAGIO, peripherals default to present and the
/// status is derived from the assignment.
pub fn insert_workstation(
    conn: &mut SqliteConnection,
    input: WorkstationInput,
    actor: Option<&Actor>,
) -> Result<Workstation, PamError> {
    use crate::schema::workstations::dsl::*;

    conn.transaction(|conn| {
        if let Some(island) = input.island_id {
            ensure_island_exists(conn, island)?;
        }
        if let Some(employee) = input.employee_id {
            ensure_employee_exists(conn, employee)?;
        }

        let cat = input.category.unwrap_or(Sector::Estagio);
        let peripherals = Peripherals {
            monitor: input.monitor.unwrap_or(true),
            keyboard: input.keyboard.unwrap_or(true),
            mouse: input.mouse.unwrap_or(true),
            mousepad: input.mousepad.unwrap_or(true),
            headset: input.headset.unwrap_or(true),
        };
        let new_workstation = NewWorkstation {
            island_id: input.island_id,
            category: cat,
            sequence: next_sequence(conn, cat)?,
            status: derive_status(
                WorkstationStatus::Unoccupied,
                input.employee_id.is_some(),
                &peripherals,
            ),
            employee_id: input.employee_id,
            monitor: peripherals.monitor,
            keyboard: peripherals.keyboard,
            mouse: peripherals.mouse,
            mousepad: peripherals.mousepad,
            headset: peripherals.headset,
        };

        diesel::insert_into(workstations)
            .values(&new_workstation)
            .execute(conn)?;
        let workstation = workstations
            .order(id.desc())
            .select(Workstation::as_select())
            .first(conn)?;

        if let Some(employee) = workstation.employee_id {
            record_assignment_change(conn, workstation.id, Some(employee))?;
            sync_employee_sector(conn, employee, workstation.category)?;
        }

        let name = employee_name(conn, workstation.employee_id)?;
        log_change(
            conn,
            actor,
            EntityType::Workstation,
            workstation.id,
            &workstation.short_name(name.as_deref()),
            ActionType::Create,
            format!("Workstation created with status {}", workstation.status.label()),
        )?;
        Ok(workstation)
    })
}

/// Inserts a workstation with a fixed sequence and no employee. Used to
/// fill the office slots, so no change log row is written.
pub(crate) fn insert_empty_slot(
    conn: &mut SqliteConnection,
    cat: Sector,
    seq: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::workstations::dsl::*;

    let slot = NewWorkstation {
        island_id: None,
        category: cat,
        sequence: seq,
        status: WorkstationStatus::Unoccupied,
        employee_id: None,
        monitor: true,
        keyboard: true,
        mouse: true,
        mousepad: true,
        headset: true,
    };
    diesel::insert_into(workstations).values(&slot).execute(conn)
}

pub fn get_workstation(
    conn: &mut SqliteConnection,
    workstation_id: i32,
) -> Result<Option<Workstation>, diesel::result::Error> {
    use crate::schema::workstations::dsl::*;
    workstations
        .filter(id.eq(workstation_id))
        .select(Workstation::as_select())
        .first(conn)
        .optional()
}

/// Sequences already used in a category.
pub fn sequences_in_category(
    conn: &mut SqliteConnection,
    cat: Sector,
) -> Result<Vec<i32>, diesel::result::Error> {
    use crate::schema::workstations::dsl::*;
    workstations
        .filter(category.eq(cat))
        .order(sequence.asc())
        .select(sequence)
        .load(conn)
}

type DetailsRow = (Workstation, Option<String>, Option<String>, Option<i32>);

fn details_from_row((workstation, employee, room, island_number): DetailsRow) -> WorkstationDetails {
    WorkstationDetails::new(workstation, employee, room, island_number)
}

/// Lists workstations with their employee, room and island, ordered by
/// category and sequence.
pub fn list_workstations(
    conn: &mut SqliteConnection,
    filter: &WorkstationFilter,
) -> Result<Vec<WorkstationDetails>, diesel::result::Error> {
    use crate::schema::{employees, islands, rooms, workstations};

    let mut query = workstations::table
        .left_join(employees::table)
        .left_join(islands::table.left_join(rooms::table))
        .select((
            Workstation::as_select(),
            employees::name.nullable(),
            rooms::name.nullable(),
            islands::island_number.nullable(),
        ))
        .into_boxed();

    if let Some(wanted) = filter.status {
        query = query.filter(workstations::status.eq(wanted));
    }
    if let Some(cat) = filter.category {
        query = query.filter(workstations::category.eq(cat));
    }
    if let Some(island) = filter.island_id {
        query = query.filter(workstations::island_id.eq(island));
    }
    if let Some(room) = filter.room_id {
        query = query.filter(islands::room_id.nullable().eq(room));
    }
    if let Some(term) = filter
        .employee_search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        query = query.filter(
            employees::name
                .nullable()
                .like(contains_pattern(term))
                .escape(LIKE_ESCAPE),
        );
    }

    let rows: Vec<DetailsRow> = query
        .order((workstations::category.asc(), workstations::sequence.asc()))
        .load(conn)?;
    Ok(rows.into_iter().map(details_from_row).collect())
}

pub fn get_workstation_details(
    conn: &mut SqliteConnection,
    workstation_id: i32,
) -> Result<Option<WorkstationDetails>, diesel::result::Error> {
    use crate::schema::{employees, islands, rooms, workstations};

    let row: Option<DetailsRow> = workstations::table
        .left_join(employees::table)
        .left_join(islands::table.left_join(rooms::table))
        .filter(workstations::id.eq(workstation_id))
        .select((
            Workstation::as_select(),
            employees::name.nullable(),
            rooms::name.nullable(),
            islands::island_number.nullable(),
        ))
        .first(conn)
        .optional()?;
    Ok(row.map(details_from_row))
}

fn describe_flag(label: &str, present: bool) -> String {
    if present {
        format!("{}: restored", label)
    } else {
        format!("{}: missing", label)
    }
}

fn describe_reference(label: &str, value: Option<String>) -> String {
    format!("{}: {}", label, value.unwrap_or_else(|| "none".to_string()))
}

/// Applies `changes` to a workstation and settles its status.
///
/// Without `explicit_status` the status is derived from the assignment and
/// the peripherals. With it, the administrator's choice is applied through
/// [`apply_status_override`], which may release the employee.
pub fn save_workstation(
    conn: &mut SqliteConnection,
    workstation_id: i32,
    changes: WorkstationChanges,
    explicit_status: Option<WorkstationStatus>,
    actor: Option<&Actor>,
) -> Result<Workstation, PamError> {
    use crate::schema::workstations::dsl::*;

    conn.transaction(|conn| {
        let current = get_workstation(conn, workstation_id)?
            .ok_or_else(|| PamError::not_found("Workstation", workstation_id))?;

        let new_island = changes.island_id.unwrap_or(current.island_id);
        let new_category = changes.category.unwrap_or(current.category);
        let mut new_employee = changes.employee_id.unwrap_or(current.employee_id);
        let mut peripherals = current.peripherals();
        for (flag, value) in [
            (Peripheral::Monitor, changes.monitor),
            (Peripheral::Keyboard, changes.keyboard),
            (Peripheral::Mouse, changes.mouse),
            (Peripheral::Mousepad, changes.mousepad),
            (Peripheral::Headset, changes.headset),
        ] {
            if let Some(present) = value {
                peripherals.set(flag, present);
            }
        }

        if new_island != current.island_id
            && let Some(island) = new_island
        {
            ensure_island_exists(conn, island)?;
        }
        if new_employee != current.employee_id
            && let Some(employee) = new_employee
        {
            ensure_employee_exists(conn, employee)?;
        }

        let new_status = match explicit_status {
            Some(requested) => {
                let (settled, employee) = apply_status_override(requested, new_employee)?;
                new_employee = employee;
                settled
            }
            None => derive_status(current.status, new_employee.is_some(), &peripherals),
        };

        let mut notes = Vec::new();
        if new_employee != current.employee_id {
            notes.push(describe_reference("employee", employee_name(conn, new_employee)?));
        }
        if new_status != current.status {
            notes.push(format!(
                "status: {} -> {}",
                current.status.label(),
                new_status.label()
            ));
        }
        if new_category != current.category {
            notes.push(format!(
                "category: {} -> {}",
                current.category.label(),
                new_category.label()
            ));
        }
        if new_island != current.island_id {
            notes.push(describe_reference("island", new_island.map(|i| i.to_string())));
        }
        let old_peripherals = current.peripherals();
        for flag in Peripheral::ALL {
            if peripherals.get(*flag) != old_peripherals.get(*flag) {
                notes.push(describe_flag(flag.label(), peripherals.get(*flag)));
            }
        }

        diesel::update(workstations.filter(id.eq(workstation_id)))
            .set((
                island_id.eq(new_island),
                category.eq(new_category),
                status.eq(new_status),
                employee_id.eq(new_employee),
                monitor.eq(peripherals.monitor),
                keyboard.eq(peripherals.keyboard),
                mouse.eq(peripherals.mouse),
                mousepad.eq(peripherals.mousepad),
                headset.eq(peripherals.headset),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        if new_employee != current.employee_id {
            record_assignment_change(conn, workstation_id, new_employee)?;
        }
        if let Some(employee) = new_employee
            && sync_employee_sector(conn, employee, new_category)?
        {
            notes.push(format!("employee sector set to {}", new_category.label()));
        }

        let workstation = workstations
            .filter(id.eq(workstation_id))
            .select(Workstation::as_select())
            .first(conn)?;
        let name = employee_name(conn, workstation.employee_id)?;
        log_change(
            conn,
            actor,
            EntityType::Workstation,
            workstation.id,
            &workstation.short_name(name.as_deref()),
            ActionType::Update,
            notes.join("; "),
        )?;
        Ok(workstation)
    })
}

/// Partial update with automatic status derivation.
pub fn update_workstation(
    conn: &mut SqliteConnection,
    workstation_id: i32,
    changes: WorkstationChanges,
    actor: Option<&Actor>,
) -> Result<Workstation, PamError> {
    save_workstation(conn, workstation_id, changes, None, actor)
}

/// Sets a status explicitly, bypassing the derivation.
pub fn set_workstation_status(
    conn: &mut SqliteConnection,
    workstation_id: i32,
    new_status: WorkstationStatus,
    actor: Option<&Actor>,
) -> Result<Workstation, PamError> {
    save_workstation(
        conn,
        workstation_id,
        WorkstationChanges::default(),
        Some(new_status),
        actor,
    )
}

/// Flips one peripheral flag and re-derives the status.
pub fn toggle_peripheral(
    conn: &mut SqliteConnection,
    workstation_id: i32,
    peripheral: Peripheral,
    actor: Option<&Actor>,
) -> Result<Workstation, PamError> {
    conn.transaction(|conn| {
        let current = get_workstation(conn, workstation_id)?
            .ok_or_else(|| PamError::not_found("Workstation", workstation_id))?;
        let flipped = Some(!current.peripherals().get(peripheral));

        let mut changes = WorkstationChanges::default();
        match peripheral {
            Peripheral::Monitor => changes.monitor = flipped,
            Peripheral::Keyboard => changes.keyboard = flipped,
            Peripheral::Mouse => changes.mouse = flipped,
            Peripheral::Mousepad => changes.mousepad = flipped,
            Peripheral::Headset => changes.headset = flipped,
        }
        save_workstation(conn, workstation_id, changes, None, actor)
    })
}

/// Applies several updates atomically. Any failure rolls back every item.
pub fn apply_workstation_batch(
    conn: &mut SqliteConnection,
    items: Vec<WorkstationBatchItem>,
    actor: Option<&Actor>,
) -> Result<Vec<Workstation>, PamError> {
    conn.transaction(|conn| {
        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            saved.push(save_workstation(conn, item.id, item.changes, item.status, actor)?);
        }
        Ok(saved)
    })
}

pub fn delete_workstation(
    conn: &mut SqliteConnection,
    workstation_id: i32,
    actor: Option<&Actor>,
) -> Result<(), PamError> {
    use crate::schema::workstations::dsl::*;

    conn.transaction(|conn| {
        let current = get_workstation(conn, workstation_id)?
            .ok_or_else(|| PamError::not_found("Workstation", workstation_id))?;
        let name = employee_name(conn, current.employee_id)?;

        delete_history_for_workstation(conn, workstation_id)?;
        diesel::delete(workstations.filter(id.eq(workstation_id))).execute(conn)?;

        log_change(
            conn,
            actor,
            EntityType::Workstation,
            current.id,
            &current.short_name(name.as_deref()),
            ActionType::Delete,
            "",
        )?;
        Ok(())
    })
}

/// Releases every workstation assigned to `employee`, re-deriving each.
pub(crate) fn release_employee(
    conn: &mut SqliteConnection,
    employee: i32,
    actor: Option<&Actor>,
) -> Result<Vec<Workstation>, PamError> {
    use crate::schema::workstations::dsl::*;

    let assigned: Vec<i32> = workstations
        .filter(employee_id.eq(employee))
        .select(id)
        .load(conn)?;
    let changes = WorkstationChanges {
        employee_id: Some(None),
        ..Default::default()
    };
    assigned
        .into_iter()
        .map(|ws| save_workstation(conn, ws, changes.clone(), None, actor))
        .collect()
}

/// Takes every workstation of `island` off the island.
pub(crate) fn detach_island(
    conn: &mut SqliteConnection,
    island: i32,
    actor: Option<&Actor>,
) -> Result<Vec<Workstation>, PamError> {
    use crate::schema::workstations::dsl::*;

    let placed: Vec<i32> = workstations
        .filter(island_id.eq(island))
        .select(id)
        .load(conn)?;
    let changes = WorkstationChanges {
        island_id: Some(None),
        ..Default::default()
    };
    placed
        .into_iter()
        .map(|ws| save_workstation(conn, ws, changes.clone(), None, actor))
        .collect()
}
