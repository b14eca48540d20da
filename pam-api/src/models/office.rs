use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{Employee, Island, Room, Sector, WorkstationDetails};

/// Workstations of one category arranged as floor-plan columns.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryLayout {
    pub category: Sector,
    pub label: String,
    /// Each column lists its workstations top to bottom as rendered.
    pub columns: Vec<Vec<WorkstationDetails>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OfficeLayout {
    pub categories: Vec<CategoryLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IslandNode {
    #[serde(flatten)]
    pub island: Island,
    pub workstations: Vec<WorkstationDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomNode {
    #[serde(flatten)]
    pub room: Room,
    pub islands: Vec<IslandNode>,
}

/// Everything the management screen shows at once.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ManagementTree {
    pub rooms: Vec<RoomNode>,
    /// Workstations that are not on any island.
    pub unplaced_workstations: Vec<WorkstationDetails>,
    pub unassigned_employees: Vec<Employee>,
}
