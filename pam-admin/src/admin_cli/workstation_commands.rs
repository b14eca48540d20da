use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use pam_api::models::{
    Actor, Peripheral, Sector, Workstation, WorkstationChanges, WorkstationFilter,
    WorkstationInput, WorkstationStatus,
};
use pam_api::orm::workstation::{
    delete_workstation, get_workstation_details, insert_workstation, list_workstations,
    set_workstation_status, toggle_peripheral, update_workstation,
};

use crate::admin_cli::utils::{SearchTerm, confirm};

#[derive(Subcommand)]
pub enum WorkstationAction {
    #[command(about = "List workstations, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term matched against the short name (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
        #[arg(short, long, help = "Only this category")]
        category: Option<Sector>,
        #[arg(short, long, help = "Only this status (OCCUPIED, UNOCCUPIED, MAINTENANCE)")]
        status: Option<WorkstationStatus>,
    },
    #[command(about = "Add a workstation with the next sequence of its category")]
    Add {
        #[arg(short, long, help = "Category (defaults to ESTAGIO)")]
        category: Option<Sector>,
        #[arg(short, long, help = "Island ID")]
        island: Option<i32>,
        #[arg(short, long, help = "Employee ID to assign")]
        employee: Option<i32>,
    },
    #[command(about = "Remove a workstation")]
    Rm {
        #[arg(help = "Workstation ID")]
        id: i32,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Assign an employee to a workstation, or release it")]
    Assign {
        #[arg(help = "Workstation ID")]
        id: i32,
        #[arg(short, long, help = "Employee ID", conflicts_with = "release")]
        employee: Option<i32>,
        #[arg(long, help = "Release the current employee")]
        release: bool,
    },
    #[command(about = "Flip one peripheral between present and missing")]
    Toggle {
        #[arg(help = "Workstation ID")]
        id: i32,
        #[arg(help = "monitor, keyboard, mouse, mousepad or headset")]
        peripheral: Peripheral,
    },
    #[command(about = "Set a status explicitly, bypassing the derivation")]
    Status {
        #[arg(help = "Workstation ID")]
        id: i32,
        #[arg(help = "OCCUPIED, UNOCCUPIED or MAINTENANCE")]
        status: WorkstationStatus,
    },
}

pub fn handle_workstation_command_with_conn(
    conn: &mut SqliteConnection,
    action: WorkstationAction,
    actor: &Actor,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WorkstationAction::Ls {
            search_term,
            fixed_string,
            category,
            status,
        } => {
            workstation_ls_impl(conn, search_term, fixed_string, category, status)?;
        }
        WorkstationAction::Add {
            category,
            island,
            employee,
        } => {
            workstation_add_impl(conn, category, island, employee, actor)?;
        }
        WorkstationAction::Rm { id, yes } => {
            workstation_rm_impl(conn, id, yes, actor)?;
        }
        WorkstationAction::Assign {
            id,
            employee,
            release,
        } => {
            workstation_assign_impl(conn, id, employee, release, actor)?;
        }
        WorkstationAction::Toggle { id, peripheral } => {
            let ws = toggle_peripheral(conn, id, peripheral, Some(actor))?;
            println!(
                "{} is now {}",
                peripheral.label(),
                if ws.peripherals().get(peripheral) { "present" } else { "missing" }
            );
            print_workstation(conn, ws.id)?;
        }
        WorkstationAction::Status { id, status } => {
            let ws = set_workstation_status(conn, id, status, Some(actor))?;
            print_workstation(conn, ws.id)?;
        }
    }
    Ok(())
}

fn print_workstation(
    conn: &mut SqliteConnection,
    workstation_id: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    let details = get_workstation_details(conn, workstation_id)?
        .ok_or_else(|| format!("Workstation with ID {} does not exist", workstation_id))?;
    println!("ID: {}", details.workstation.id);
    println!("Name: {}", details.short_name);
    println!("Location: {}", details.display_name);
    println!("Status: {}", details.status_label);
    let missing = details.workstation.peripherals().missing();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|p| p.label()).collect();
        println!("Missing: {}", labels.join(", "));
    }
    Ok(())
}

pub fn workstation_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
    category: Option<Sector>,
    status: Option<WorkstationStatus>,
) -> Result<(), Box<dyn std::error::Error>> {
    let term = SearchTerm::new(search_term, fixed_string)?;
    let filter = WorkstationFilter {
        status,
        category,
        ..Default::default()
    };
    let workstations = term.filter(list_workstations(conn, &filter)?, |d| d.short_name.as_str());

    if workstations.is_empty() {
        println!("No workstations found.");
        return Ok(());
    }

    println!("Workstations:");
    for details in workstations {
        let missing = details.workstation.peripherals().missing();
        let missing = if missing.is_empty() {
            String::new()
        } else {
            let labels: Vec<&str> = missing.iter().map(|p| p.label()).collect();
            format!(", Missing: {}", labels.join(", "))
        };
        println!(
            "  ID: {}, {}, Location: {}, Status: {}{}",
            details.workstation.id,
            details.short_name,
            details.display_name,
            details.status_label,
            missing
        );
    }
    Ok(())
}

pub fn workstation_add_impl(
    conn: &mut SqliteConnection,
    category: Option<Sector>,
    island_id: Option<i32>,
    employee_id: Option<i32>,
    actor: &Actor,
) -> Result<Workstation, Box<dyn std::error::Error>> {
    let ws = insert_workstation(
        conn,
        WorkstationInput {
            island_id,
            category,
            employee_id,
            ..Default::default()
        },
        Some(actor),
    )?;

    println!("Workstation created successfully!");
    print_workstation(conn, ws.id)?;
    Ok(ws)
}

pub fn workstation_rm_impl(
    conn: &mut SqliteConnection,
    workstation_id: i32,
    yes: bool,
    actor: &Actor,
) -> Result<bool, Box<dyn std::error::Error>> {
    let details = get_workstation_details(conn, workstation_id)?
        .ok_or_else(|| format!("Workstation with ID {} does not exist", workstation_id))?;

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete {} (ID: {})?",
            details.short_name, workstation_id
        ))?
    {
        println!("Operation cancelled.");
        return Ok(false);
    }

    delete_workstation(conn, workstation_id, Some(actor))?;
    println!("Deleted workstation: {} (ID: {})", details.short_name, workstation_id);
    Ok(true)
}

pub fn workstation_assign_impl(
    conn: &mut SqliteConnection,
    workstation_id: i32,
    employee_id: Option<i32>,
    release: bool,
    actor: &Actor,
) -> Result<Workstation, Box<dyn std::error::Error>> {
    let assignment = match (employee_id, release) {
        (Some(employee), false) => Some(employee),
        (None, true) => None,
        _ => return Err("Use either --employee <ID> or --release".into()),
    };

    let ws = update_workstation(
        conn,
        workstation_id,
        WorkstationChanges {
            employee_id: Some(assignment),
            ..Default::default()
        },
        Some(actor),
    )?;
    print_workstation(conn, ws.id)?;
    Ok(ws)
}
