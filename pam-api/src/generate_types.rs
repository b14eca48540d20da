//! TypeScript type generation module.
//!
//! Running the test suite writes a `.ts` file for every API type into the
//! output directory, for the front end to import.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    #[test]
    fn generate_typescript_types() {
        // Output directory in order of preference:
        // 1. Environment variable PAM_TS_OUTPUT_DIR
        // 2. ../../frontend/src/types/generated (if the front end is checked out)
        // 3. ../ts-bindings (fallback)
        let output_dir_str = if let Ok(env_dir) = env::var("PAM_TS_OUTPUT_DIR") {
            println!("Using TypeScript output directory from PAM_TS_OUTPUT_DIR: {}", env_dir);
            env_dir
        } else {
            let frontend_dir = "../../frontend/src/types/generated";
            let fallback_dir = "../ts-bindings";

            if Path::new(frontend_dir).parent().unwrap_or(Path::new("")).exists() {
                println!("Using front end directory: {}", frontend_dir);
                frontend_dir.to_string()
            } else {
                println!("Using fallback directory: {}", fallback_dir);
                fallback_dir.to_string()
            }
        };

        let output_dir = Path::new(&output_dir_str);

        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).expect("Failed to create output directory");
        }

        // Remove stale bindings so renamed or deleted types do not linger
        for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                std::fs::remove_file(&path)
                    .unwrap_or_else(|_| panic!("Failed to remove {:?}", path));
            }
        }

        unsafe {
            env::set_var("TS_RS_EXPORT_DIR", output_dir);
        }

        use crate::api::ErrorResponse;
        use crate::api::login::{LoginRequest, LoginSuccessResponse};
        use crate::api::office::AdminOfficeView;
        use crate::api::status::HealthStatus;
        use crate::api::workstation::WorkstationUpdate;
        use crate::models::*;
        use crate::status::Peripherals;

        // Enums
        Sector::export().expect("Failed to export Sector type");
        WorkstationStatus::export().expect("Failed to export WorkstationStatus type");
        Peripheral::export().expect("Failed to export Peripheral type");
        EntityType::export().expect("Failed to export EntityType type");
        ActionType::export().expect("Failed to export ActionType type");

        // Entities
        Employee::export().expect("Failed to export Employee type");
        EmployeeInput::export().expect("Failed to export EmployeeInput type");
        UpdateEmployeeRequest::export().expect("Failed to export UpdateEmployeeRequest type");
        Room::export().expect("Failed to export Room type");
        RoomInput::export().expect("Failed to export RoomInput type");
        Island::export().expect("Failed to export Island type");
        IslandInput::export().expect("Failed to export IslandInput type");
        UpdateIslandRequest::export().expect("Failed to export UpdateIslandRequest type");
        Workstation::export().expect("Failed to export Workstation type");
        WorkstationInput::export().expect("Failed to export WorkstationInput type");
        WorkstationChanges::export().expect("Failed to export WorkstationChanges type");
        WorkstationBatchItem::export().expect("Failed to export WorkstationBatchItem type");
        WorkstationDetails::export().expect("Failed to export WorkstationDetails type");
        Peripherals::export().expect("Failed to export Peripherals type");
        ChangeLog::export().expect("Failed to export ChangeLog type");
        EmployeePosition::export().expect("Failed to export EmployeePosition type");

        // Office views
        CategoryLayout::export().expect("Failed to export CategoryLayout type");
        OfficeLayout::export().expect("Failed to export OfficeLayout type");
        IslandNode::export().expect("Failed to export IslandNode type");
        RoomNode::export().expect("Failed to export RoomNode type");
        ManagementTree::export().expect("Failed to export ManagementTree type");

        // Users
        User::export().expect("Failed to export User type");
        UserWithRoles::export().expect("Failed to export UserWithRoles type");
        Role::export().expect("Failed to export Role type");

        // API types
        ErrorResponse::export().expect("Failed to export ErrorResponse type");
        LoginRequest::export().expect("Failed to export LoginRequest type");
        LoginSuccessResponse::export().expect("Failed to export LoginSuccessResponse type");
        HealthStatus::export().expect("Failed to export HealthStatus type");
        WorkstationUpdate::export().expect("Failed to export WorkstationUpdate type");
        AdminOfficeView::export().expect("Failed to export AdminOfficeView type");

        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
