//! Demo data for a fresh database.
//!
//! Creates the twelve office slots of every category, a fixed list of
//! sample employees spread over the first twelve sequences and, on request,
//! random employees until each sector has a given headcount.

use clap::Args;
use diesel::sqlite::SqliteConnection;
use pam_api::models::{Actor, EmployeeFilter, EmployeeInput, Sector, WorkstationChanges, WorkstationFilter};
use pam_api::orm::employee::{insert_employee, list_employees};
use pam_api::orm::office::ensure_category_slots;
use pam_api::orm::workstation::{list_workstations, update_workstation};
use rand::Rng;
use rand::seq::IndexedRandom;

const SAMPLE_EMPLOYEES: &[&str] = &[
    "Ana Maria",
    "Maria Souza",
    "Carlos Oliveira",
    "Ana Santos",
    "Pedro Costa",
    "Mariana Lima",
    "Lucas Pereira",
    "Juliana Almeida",
    "Ricardo Fernandes",
    "Patrícia Gomes",
    "Fernanda Alves",
    "Rodrigo Martins",
    "Camila Ribeiro",
    "Gustavo Silva",
    "Beatriz Ferreira",
    "Rafael Barbosa",
    "Larissa Castro",
    "Thiago Mendes",
    "Sofia Nogueira",
    "Bruno Carvalho",
];

const FIRST_NAMES: &[&str] = &[
    "João", "Pedro", "Carlos", "Paulo", "José", "Roberto", "Antônio", "Fernando", "Rafael",
    "Marcelo", "André", "Eduardo", "Maria", "Ana", "Juliana", "Patrícia", "Sandra", "Camila",
    "Beatriz", "Luciana", "Carla", "Helena", "Gabriela", "Isabela",
];

const SURNAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Pereira", "Costa", "Rodrigues", "Almeida",
    "Nascimento", "Lima", "Araújo", "Ribeiro", "Martins", "Ferreira", "Carvalho", "Gomes",
    "Barbosa", "Dias", "Mendes", "Cardoso",
];

/// Fill the database with demo data
#[derive(Debug, Args)]
pub struct SeedArgs {
    #[arg(
        short,
        long,
        help = "Add random employees until every sector has this many"
    )]
    pub random: Option<usize>,
}

/// What a seed run created.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub slots: usize,
    pub employees: usize,
    pub assignments: usize,
    pub random_employees: usize,
}

pub fn handle_seed_command_with_conn(
    conn: &mut SqliteConnection,
    args: SeedArgs,
    actor: &Actor,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = seed_impl(conn, args.random, actor)?;

    println!("Demo data loaded:");
    println!("- {} workstation slot(s) created", summary.slots);
    println!("- {} sample employee(s) created", summary.employees);
    println!("- {} workstation(s) assigned", summary.assignments);
    if args.random.is_some() {
        println!("- {} random employee(s) created", summary.random_employees);
    }
    Ok(())
}

/// Runs the seed. Existing employees and assignments are left alone, so
/// running it twice adds nothing.
pub fn seed_impl(
    conn: &mut SqliteConnection,
    random_per_sector: Option<usize>,
    actor: &Actor,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    let mut summary = SeedSummary {
        slots: ensure_category_slots(conn)?,
        ..Default::default()
    };

    let existing: Vec<String> = list_employees(conn, &EmployeeFilter::default())?
        .into_iter()
        .map(|e| e.name)
        .collect();

    for (index, name) in SAMPLE_EMPLOYEES.iter().enumerate() {
        if existing.iter().any(|e| e == name) {
            continue;
        }
        let employee = insert_employee(
            conn,
            EmployeeInput {
                name: name.to_string(),
                sector: None,
            },
            Some(actor),
        )?;
        summary.employees += 1;

        let sequence = index as i32 + 1;
        if sequence > 12 {
            continue;
        }
        let category = Sector::ALL[index % Sector::ALL.len()];
        let slot = list_workstations(
            conn,
            &WorkstationFilter {
                category: Some(category),
                ..Default::default()
            },
        )?
        .into_iter()
        .find(|d| d.workstation.sequence == sequence);

        if let Some(slot) = slot
            && slot.workstation.employee_id.is_none()
        {
            update_workstation(
                conn,
                slot.workstation.id,
                WorkstationChanges {
                    employee_id: Some(Some(employee.id)),
                    monitor: Some(sequence != 3),
                    keyboard: Some(sequence != 5),
                    mouse: Some(sequence != 8),
                    headset: Some(sequence % 2 == 0),
                    ..Default::default()
                },
                Some(actor),
            )?;
            summary.assignments += 1;
        }
    }

    if let Some(target) = random_per_sector {
        let mut rng = rand::rng();
        for sector in Sector::ALL {
            let current = list_employees(
                conn,
                &EmployeeFilter {
                    search: None,
                    sector: Some(*sector),
                },
            )?
            .len();
            for _ in current..target {
                insert_employee(
                    conn,
                    EmployeeInput {
                        name: random_name(&mut rng),
                        sector: Some(*sector),
                    },
                    Some(actor),
                )?;
                summary.random_employees += 1;
            }
        }
    }

    Ok(summary)
}

/// A first name followed by one or two distinct surnames.
fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ana");
    let surnames: Vec<&str> = if rng.random_bool(0.5) {
        SURNAMES.choose_multiple(rng, 2).copied().collect()
    } else {
        SURNAMES.choose(rng).copied().into_iter().collect()
    };
    format!("{} {}", first, surnames.join(" "))
}
