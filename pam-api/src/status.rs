//! Workstation status rules.
//!
//! Status is normally derived from two facts: whether an employee sits at
//! the workstation and whether its core equipment (monitor, keyboard and
//! mouse) is present. Administrators may also set a status explicitly from
//! the office view, which bypasses the derivation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::PamError;
use crate::models::{Peripheral, WorkstationStatus};

/// Equipment flags of a workstation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Peripherals {
    pub monitor: bool,
    pub keyboard: bool,
    pub mouse: bool,
    pub mousepad: bool,
    pub headset: bool,
}

impl Default for Peripherals {
    fn default() -> Self {
        Peripherals {
            monitor: true,
            keyboard: true,
            mouse: true,
            mousepad: true,
            headset: true,
        }
    }
}

impl Peripherals {
    /// Monitor, keyboard and mouse are all present. Mousepad and headset
    /// do not affect the status.
    pub fn core_complete(&self) -> bool {
        self.monitor && self.keyboard && self.mouse
    }

    pub fn get(&self, peripheral: Peripheral) -> bool {
        match peripheral {
            Peripheral::Monitor => self.monitor,
            Peripheral::Keyboard => self.keyboard,
            Peripheral::Mouse => self.mouse,
            Peripheral::Mousepad => self.mousepad,
            Peripheral::Headset => self.headset,
        }
    }

    pub fn set(&mut self, peripheral: Peripheral, present: bool) {
        match peripheral {
            Peripheral::Monitor => self.monitor = present,
            Peripheral::Keyboard => self.keyboard = present,
            Peripheral::Mouse => self.mouse = present,
            Peripheral::Mousepad => self.mousepad = present,
            Peripheral::Headset => self.headset = present,
        }
    }

    /// Peripherals that are currently missing.
    pub fn missing(&self) -> Vec<Peripheral> {
        Peripheral::ALL
            .iter()
            .copied()
            .filter(|p| !self.get(*p))
            .collect()
    }
}

/// Computes the status applied by an ordinary save.
///
/// An empty workstation is always `Unoccupied`. An occupied one with a
/// missing core peripheral goes to `Maintenance`. A `Maintenance` status set
/// by hand is kept while someone is assigned, so it is only cleared through
/// [`apply_status_override`].
pub fn derive_status(
    current: WorkstationStatus,
    has_employee: bool,
    peripherals: &Peripherals,
) -> WorkstationStatus {
    if !has_employee {
        return WorkstationStatus::Unoccupied;
    }
    if !peripherals.core_complete() || current == WorkstationStatus::Maintenance {
        return WorkstationStatus::Maintenance;
    }
    WorkstationStatus::Occupied
}

/// Applies a status chosen explicitly by an administrator.
///
/// Returns the status and employee to store. `Unoccupied` releases the
/// employee, `Maintenance` keeps whoever is assigned and `Occupied` needs an
/// employee.
pub fn apply_status_override(
    requested: WorkstationStatus,
    employee_id: Option<i32>,
) -> Result<(WorkstationStatus, Option<i32>), PamError> {
    match requested {
        WorkstationStatus::Unoccupied => Ok((WorkstationStatus::Unoccupied, None)),
        WorkstationStatus::Maintenance => Ok((WorkstationStatus::Maintenance, employee_id)),
        WorkstationStatus::Occupied => match employee_id {
            Some(id) => Ok((WorkstationStatus::Occupied, Some(id))),
            None => Err(PamError::Validation(
                "An occupied workstation needs an assigned employee".to_string(),
            )),
        },
    }
}
