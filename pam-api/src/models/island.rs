use diesel::{Associations, Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::Sector;
use crate::schema::islands;

/// A cluster of workstations inside a room.
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
#[diesel(belongs_to(crate::models::room::Room))]
#[diesel(table_name = islands)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Island {
    pub id: i32,
    pub room_id: i32, // Foreign key to Room
    pub island_number: i32,
    pub category: Sector,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = islands)]
pub struct NewIsland {
    pub room_id: i32,
    pub island_number: i32,
    pub category: Sector,
}

// For API inputs and validation
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct IslandInput {
    pub room_id: i32,
    pub island_number: i32,
    pub category: Option<Sector>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateIslandRequest {
    pub room_id: Option<i32>,
    pub island_number: Option<i32>,
    pub category: Option<Sector>,
}
