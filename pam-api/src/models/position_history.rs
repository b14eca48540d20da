use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::employee_position_history;

/// One interval during which an employee occupied a workstation.
/// `end_time` stays NULL while the interval is open.
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    QueryableByName,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    TS,
)]
#[diesel(belongs_to(crate::models::employee::Employee))]
#[diesel(belongs_to(crate::models::workstation::Workstation))]
#[diesel(table_name = employee_position_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct EmployeePosition {
    pub id: i32,
    pub employee_id: i32,
    pub workstation_id: i32,
    #[ts(type = "string")]
    pub start_time: NaiveDateTime,
    #[ts(type = "string | null")]
    pub end_time: Option<NaiveDateTime>,
}

impl EmployeePosition {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = employee_position_history)]
pub struct NewEmployeePosition {
    pub employee_id: i32,
    pub workstation_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}
