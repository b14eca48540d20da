//! Intervals during which employees sat at workstations.
//!
//! The workstation ORM calls [`record_assignment_change`] whenever the
//! employee of a workstation changes, which keeps at most one open interval
//! per workstation.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::models::{EmployeePosition, NewEmployeePosition};

/// Closes the open interval of `workstation_id`, if any, and opens a new one
/// for `new_employee`.
pub fn record_assignment_change(
    conn: &mut SqliteConnection,
    workstation_id_val: i32,
    new_employee: Option<i32>,
) -> Result<(), diesel::result::Error> {
    let now = Utc::now().naive_utc();
    close_open_intervals_for_workstation(conn, workstation_id_val, now)?;
    if let Some(employee) = new_employee {
        open_interval(conn, employee, workstation_id_val, now)?;
    }
    Ok(())
}

fn open_interval(
    conn: &mut SqliteConnection,
    employee: i32,
    workstation: i32,
    at: NaiveDateTime,
) -> Result<(), diesel::result::Error> {
    use crate::schema::employee_position_history::dsl::*;

    let new_position = NewEmployeePosition {
        employee_id: employee,
        workstation_id: workstation,
        start_time: at,
        end_time: None,
    };
    diesel::insert_into(employee_position_history)
        .values(&new_position)
        .execute(conn)?;
    Ok(())
}

fn close_open_intervals_for_workstation(
    conn: &mut SqliteConnection,
    workstation: i32,
    at: NaiveDateTime,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::employee_position_history::dsl::*;

    diesel::update(
        employee_position_history
            .filter(workstation_id.eq(workstation))
            .filter(end_time.is_null()),
    )
    .set(end_time.eq(Some(at)))
    .execute(conn)
}

/// All intervals of an employee, newest first.
pub fn history_for_employee(
    conn: &mut SqliteConnection,
    employee: i32,
) -> Result<Vec<EmployeePosition>, diesel::result::Error> {
    use crate::schema::employee_position_history::dsl::*;

    employee_position_history
        .filter(employee_id.eq(employee))
        .order((start_time.desc(), id.desc()))
        .select(EmployeePosition::as_select())
        .load(conn)
}

/// All intervals recorded at a workstation, newest first.
pub fn history_for_workstation(
    conn: &mut SqliteConnection,
    workstation: i32,
) -> Result<Vec<EmployeePosition>, diesel::result::Error> {
    use crate::schema::employee_position_history::dsl::*;

    employee_position_history
        .filter(workstation_id.eq(workstation))
        .order((start_time.desc(), id.desc()))
        .select(EmployeePosition::as_select())
        .load(conn)
}

/// The open interval of an employee, if they currently sit somewhere.
pub fn current_position(
    conn: &mut SqliteConnection,
    employee: i32,
) -> Result<Option<EmployeePosition>, diesel::result::Error> {
    use crate::schema::employee_position_history::dsl::*;

    employee_position_history
        .filter(employee_id.eq(employee))
        .filter(end_time.is_null())
        .order(id.desc())
        .select(EmployeePosition::as_select())
        .first(conn)
        .optional()
}

/// Removes every interval of an employee.
pub fn delete_history_for_employee(
    conn: &mut SqliteConnection,
    employee: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::employee_position_history::dsl::*;
    diesel::delete(employee_position_history.filter(employee_id.eq(employee))).execute(conn)
}

/// Removes every interval recorded at a workstation.
pub fn delete_history_for_workstation(
    conn: &mut SqliteConnection,
    workstation: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::employee_position_history::dsl::*;
    diesel::delete(employee_position_history.filter(workstation_id.eq(workstation)))
        .execute(conn)
}
