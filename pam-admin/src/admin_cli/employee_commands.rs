use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use pam_api::models::{Actor, Employee, EmployeeFilter, EmployeeInput, Sector, UpdateEmployeeRequest};
use pam_api::orm::employee::{delete_employee, insert_employee, list_employees, update_employee};
use pam_api::orm::position_history::current_position;

use crate::admin_cli::utils::{SearchTerm, confirm};

#[derive(Subcommand)]
pub enum EmployeeAction {
    #[command(about = "List employees, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
        #[arg(short, long, help = "Only employees of this sector (INSS, SIAPE_LEO, SIAPE_DION, ESTAGIO)")]
        sector: Option<Sector>,
    },
    #[command(about = "Add a new employee")]
    Add {
        #[arg(short, long, help = "Employee name")]
        name: String,
        #[arg(short, long, help = "Sector (defaults to INSS)")]
        sector: Option<Sector>,
    },
    #[command(about = "Remove employees matching search term")]
    Rm {
        #[arg(
            help = "Search term to match employees for removal (regex by default, use -F for fixed string)"
        )]
        search_term: String,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Edit employee fields")]
    Edit {
        #[arg(short, long, help = "Employee ID to edit")]
        id: i32,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New sector")]
        sector: Option<Sector>,
    },
}

pub fn handle_employee_command_with_conn(
    conn: &mut SqliteConnection,
    action: EmployeeAction,
    actor: &Actor,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EmployeeAction::Ls {
            search_term,
            fixed_string,
            sector,
        } => {
            employee_ls_impl(conn, search_term, fixed_string, sector)?;
        }
        EmployeeAction::Add { name, sector } => {
            employee_add_impl(conn, name, sector, actor)?;
        }
        EmployeeAction::Rm {
            search_term,
            fixed_string,
            yes,
        } => {
            employee_rm_impl(conn, search_term, fixed_string, yes, actor)?;
        }
        EmployeeAction::Edit { id, name, sector } => {
            employee_edit_impl(conn, id, name, sector, actor)?;
        }
    }
    Ok(())
}

fn matching_employees(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
    sector: Option<Sector>,
) -> Result<Vec<Employee>, Box<dyn std::error::Error>> {
    let term = SearchTerm::new(search_term, fixed_string)?;
    let employees = list_employees(
        conn,
        &EmployeeFilter {
            search: None,
            sector,
        },
    )?;
    Ok(term.filter(employees, |e| e.name.as_str()))
}

pub fn employee_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
    sector: Option<Sector>,
) -> Result<(), Box<dyn std::error::Error>> {
    let employees = matching_employees(conn, search_term, fixed_string, sector)?;

    if employees.is_empty() {
        println!("No employees found.");
        return Ok(());
    }

    println!("Employees:");
    for employee in employees {
        let position = match current_position(conn, employee.id)? {
            Some(p) => format!("workstation {}", p.workstation_id),
            None => "unassigned".to_string(),
        };
        println!(
            "  ID: {}, Name: {}, Sector: {}, Position: {}",
            employee.id,
            employee.name,
            employee.sector.label(),
            position
        );
    }
    Ok(())
}

pub fn employee_add_impl(
    conn: &mut SqliteConnection,
    name: String,
    sector: Option<Sector>,
    actor: &Actor,
) -> Result<Employee, Box<dyn std::error::Error>> {
    let employee = insert_employee(conn, EmployeeInput { name, sector }, Some(actor))?;

    println!("Employee created successfully!");
    println!("ID: {}", employee.id);
    println!("Name: {}", employee.name);
    println!("Sector: {}", employee.sector.label());
    Ok(employee)
}

pub fn employee_rm_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
    actor: &Actor,
) -> Result<usize, Box<dyn std::error::Error>> {
    let employees = matching_employees(conn, Some(search_term), fixed_string, None)?;

    if employees.is_empty() {
        println!("No employees found matching the search term.");
        return Ok(0);
    }

    println!(
        "Found {} employee(s) matching the search term:",
        employees.len()
    );
    for employee in &employees {
        println!("  ID: {}, Name: {}", employee.id, employee.name);
    }

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete these {} employee(s)? Their workstations will be released.",
            employees.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    let mut errors = Vec::new();
    for employee in employees {
        match delete_employee(conn, employee.id, Some(actor)) {
            Ok(()) => {
                deleted_count += 1;
                println!("Deleted employee: {} (ID: {})", employee.name, employee.id);
            }
            Err(e) => errors.push(format!(
                "Failed to delete employee {} (ID: {}): {}",
                employee.name, employee.id, e
            )),
        }
    }

    println!("Successfully deleted {} employee(s).", deleted_count);
    if !errors.is_empty() {
        println!("Errors encountered:");
        for error in errors {
            println!("  {}", error);
        }
        return Err("Some deletions failed".into());
    }
    Ok(deleted_count)
}

pub fn employee_edit_impl(
    conn: &mut SqliteConnection,
    employee_id: i32,
    name: Option<String>,
    sector: Option<Sector>,
    actor: &Actor,
) -> Result<(), Box<dyn std::error::Error>> {
    if name.is_none() && sector.is_none() {
        println!("No fields specified for update. Use --name or --sector.");
        return Ok(());
    }

    let employee = update_employee(
        conn,
        employee_id,
        UpdateEmployeeRequest { name, sector },
        Some(actor),
    )?;

    println!("Employee updated successfully!");
    println!("ID: {}", employee.id);
    println!("Name: {}", employee.name);
    println!("Sector: {}", employee.sector.label());
    Ok(())
}
