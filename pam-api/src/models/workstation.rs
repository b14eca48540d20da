use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::Sector;
use crate::schema::workstations;
use crate::status::Peripherals;

text_enum! {
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum WorkstationStatus {
        Occupied => ("OCCUPIED", "Ocupada"),
        Unoccupied => ("UNOCCUPIED", "Vaga"),
        Maintenance => ("MAINTENANCE", "Manutenção"),
    }
}

text_enum! {
    /// One of the five pieces of equipment tracked per workstation.
    #[serde(rename_all = "lowercase")]
    pub enum Peripheral {
        Monitor => ("monitor", "Monitor"),
        Keyboard => ("keyboard", "Teclado"),
        Mouse => ("mouse", "Mouse"),
        Mousepad => ("mousepad", "Mousepad"),
        Headset => ("headset", "Fone de Ouvido"),
    }
}

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
#[diesel(belongs_to(crate::models::island::Island))]
#[diesel(belongs_to(crate::models::employee::Employee))]
#[diesel(table_name = workstations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Workstation {
    pub id: i32,
    pub island_id: Option<i32>,
    pub category: Sector,
    pub sequence: i32,
    pub status: WorkstationStatus,
    pub employee_id: Option<i32>,
    pub monitor: bool,
    pub keyboard: bool,
    pub mouse: bool,
    pub mousepad: bool,
    pub headset: bool,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

impl Workstation {
    pub fn peripherals(&self) -> Peripherals {
        Peripherals {
            monitor: self.monitor,
            keyboard: self.keyboard,
            mouse: self.mouse,
            mousepad: self.mousepad,
            headset: self.headset,
        }
    }

    /// Short label, e.g. `PA INSS-3 - Ana Maria`.
    pub fn short_name(&self, employee_name: Option<&str>) -> String {
        format!(
            "PA {}-{} - {}",
            self.category.as_str(),
            self.sequence,
            employee_name.unwrap_or("Sem funcionário")
        )
    }

    /// Location label: `Sala 101, Ilha 2, PA 3` when placed on an island,
    /// otherwise `Estágio 3`.
    pub fn display_name(&self, location: Option<(&str, i32)>) -> String {
        match location {
            Some((room_name, island_number)) => {
                format!("Sala {}, Ilha {}, PA {}", room_name, island_number, self.sequence)
            }
            None => format!("{} {}", self.category.label(), self.sequence),
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = workstations)]
pub struct NewWorkstation {
    pub island_id: Option<i32>,
    pub category: Sector,
    pub sequence: i32,
    pub status: WorkstationStatus,
    pub employee_id: Option<i32>,
    pub monitor: bool,
    pub keyboard: bool,
    pub mouse: bool,
    pub mousepad: bool,
    pub headset: bool,
}

/// Payload for creating a workstation. The sequence is always assigned by
/// the server and the status is derived.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct WorkstationInput {
    pub island_id: Option<i32>,
    pub category: Option<Sector>,
    pub employee_id: Option<i32>,
    pub monitor: Option<bool>,
    pub keyboard: Option<bool>,
    pub mouse: Option<bool>,
    pub mousepad: Option<bool>,
    pub headset: Option<bool>,
}

/// Partial update of a workstation. For the nullable references, a missing
/// key leaves the value untouched and `null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct WorkstationChanges {
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[ts(type = "number | null")]
    pub island_id: Option<Option<i32>>,
    pub category: Option<Sector>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[ts(type = "number | null")]
    pub employee_id: Option<Option<i32>>,
    pub monitor: Option<bool>,
    pub keyboard: Option<bool>,
    pub mouse: Option<bool>,
    pub mousepad: Option<bool>,
    pub headset: Option<bool>,
}

/// One entry of a batch update.
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct WorkstationBatchItem {
    pub id: i32,
    #[serde(flatten)]
    pub changes: WorkstationChanges,
    /// Explicit status applied after the changes, as in the office form.
    pub status: Option<WorkstationStatus>,
}

/// Filters accepted by the workstation listing.
#[derive(Debug, Clone, Default)]
pub struct WorkstationFilter {
    pub status: Option<WorkstationStatus>,
    pub category: Option<Sector>,
    pub room_id: Option<i32>,
    pub island_id: Option<i32>,
    /// Case-insensitive substring of the assigned employee's name.
    pub employee_search: Option<String>,
}

/// A workstation together with the names needed to display it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkstationDetails {
    #[serde(flatten)]
    pub workstation: Workstation,
    pub employee_name: Option<String>,
    pub room_name: Option<String>,
    pub island_number: Option<i32>,
    pub display_name: String,
    pub short_name: String,
    pub category_label: String,
    pub status_label: String,
}

impl WorkstationDetails {
    pub fn new(
        workstation: Workstation,
        employee_name: Option<String>,
        room_name: Option<String>,
        island_number: Option<i32>,
    ) -> Self {
        let location = match (room_name.as_deref(), island_number) {
            (Some(room), Some(number)) => Some((room, number)),
            _ => None,
        };
        let display_name = workstation.display_name(location);
        let short_name = workstation.short_name(employee_name.as_deref());
        let category_label = workstation.category.label().to_string();
        let status_label = workstation.status.label().to_string();
        WorkstationDetails {
            workstation,
            employee_name,
            room_name,
            island_number,
            display_name,
            short_name,
            category_label,
            status_label,
        }
    }
}
