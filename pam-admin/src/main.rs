/*!
 * PAM Administrative CLI Utility
 *
 * Command-line interface for managing a pam-api SQLite database directly:
 * employees, rooms, islands, workstations, login accounts, the change log
 * and demo data.
 *
 * Every mutation goes through the ORM functions of pam-api, so status
 * derivation, position history and change log entries behave exactly as
 * they do behind the HTTP API. CLI edits are logged under
 * `<system user>@pam-admin`.
 *
 * For detailed usage information and available commands, run with --help.
 */

mod admin_cli;

use admin_cli::employee_commands::{EmployeeAction, handle_employee_command_with_conn};
use admin_cli::island_commands::{IslandAction, handle_island_command_with_conn};
use admin_cli::log_commands::{LogArgs, handle_log_command_with_conn};
use admin_cli::room_commands::{RoomAction, handle_room_command_with_conn};
use admin_cli::seed_commands::{SeedArgs, handle_seed_command_with_conn};
use admin_cli::user_commands::{UserAction, handle_user_command_with_conn};
use admin_cli::utils::{cli_actor, establish_connection};
use admin_cli::workstation_commands::{WorkstationAction, handle_workstation_command_with_conn};
use clap::{Parser, Subcommand};

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "pam-admin")]
#[command(about = "Administrative CLI for the PA assignment database")]
#[command(version = built_info::PKG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },
    Room {
        #[command(subcommand)]
        action: RoomAction,
    },
    Island {
        #[command(subcommand)]
        action: IslandAction,
    },
    #[command(alias = "pa")]
    Workstation {
        #[command(subcommand)]
        action: WorkstationAction,
    },
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    Log(LogArgs),
    Seed(SeedArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = establish_connection()?;
    let actor = cli_actor();

    match command {
        Commands::Employee { action } => handle_employee_command_with_conn(&mut conn, action, &actor),
        Commands::Room { action } => handle_room_command_with_conn(&mut conn, action, &actor),
        Commands::Island { action } => handle_island_command_with_conn(&mut conn, action, &actor),
        Commands::Workstation { action } => {
            handle_workstation_command_with_conn(&mut conn, action, &actor)
        }
        Commands::User { action } => handle_user_command_with_conn(&mut conn, action),
        Commands::Log(args) => handle_log_command_with_conn(&mut conn, args),
        Commands::Seed(args) => handle_seed_command_with_conn(&mut conn, args, &actor),
    }
}
