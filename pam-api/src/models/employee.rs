use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::employees;

text_enum! {
    /// Organizational sector. Employees belong to one and workstations are
    /// categorized by the same values.
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum Sector {
        Inss => ("INSS", "INSS"),
        SiapeLeo => ("SIAPE_LEO", "SIAPE Leo"),
        SiapeDion => ("SIAPE_DION", "SIAPE Dion"),
        Estagio => ("ESTAGIO", "Estágio"),
    }
}

impl Default for Sector {
    fn default() -> Self {
        Sector::Inss
    }
}

/// Maximum length of an employee name.
pub const EMPLOYEE_NAME_MAX_LEN: usize = 100;

#[derive(
    Queryable, Selectable, Identifiable, QueryableByName, Debug, Clone, Serialize, Deserialize, TS,
)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub sector: Sector,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub name: String,
    pub sector: Sector,
}

// For API inputs and validation
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct EmployeeInput {
    pub name: String,
    pub sector: Option<Sector>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub sector: Option<Sector>,
}

/// Filters accepted by the employee listing.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    pub sector: Option<Sector>,
}
