use chrono::Utc;
use diesel::prelude::*;

use crate::error::PamError;
use crate::models::{
    ActionType, Actor, EMPLOYEE_NAME_MAX_LEN, EntityType, Employee, EmployeeFilter, EmployeeInput,
    NewEmployee, Sector, UpdateEmployeeRequest,
};
use crate::orm::{LIKE_ESCAPE, contains_pattern};
use crate::orm::change_log::log_change;
use crate::orm::position_history::delete_history_for_employee;
use crate::orm::workstation::release_employee;

/// Trims a name and checks its length.
pub fn validate_employee_name(raw: &str) -> Result<String, PamError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PamError::Validation("Employee name is required".to_string()));
    }
    if trimmed.chars().count() > EMPLOYEE_NAME_MAX_LEN {
        return Err(PamError::Validation(format!(
            "Employee name must be at most {} characters",
            EMPLOYEE_NAME_MAX_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Creates an employee. The sector defaults to INSS.
pub fn insert_employee(
    conn: &mut SqliteConnection,
    input: EmployeeInput,
    actor: Option<&Actor>,
) -> Result<Employee, PamError> {
    use crate::schema::employees::dsl::*;

    let new_employee = NewEmployee {
        name: validate_employee_name(&input.name)?,
        sector: input.sector.unwrap_or_default(),
    };

    conn.transaction(|conn| {
        diesel::insert_into(employees).values(&new_employee).execute(conn)?;
        let employee = employees
            .order(id.desc())
            .select(Employee::as_select())
            .first(conn)?;

        log_change(
            conn,
            actor,
            EntityType::Employee,
            employee.id,
            &employee.name,
            ActionType::Create,
            format!("Employee created in sector {}", employee.sector.label()),
        )?;
        Ok(employee)
    })
}

pub fn get_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Option<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees
        .filter(id.eq(employee_id))
        .select(Employee::as_select())
        .first(conn)
        .optional()
}

/// Lists employees ordered by name.
pub fn list_employees(
    conn: &mut SqliteConnection,
    filter: &EmployeeFilter,
) -> Result<Vec<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;

    let mut query = employees.into_boxed();
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        // SQLite LIKE is case-insensitive for ASCII
        query = query.filter(name.like(contains_pattern(term)).escape(LIKE_ESCAPE));
    }
    if let Some(wanted) = filter.sector {
        query = query.filter(sector.eq(wanted));
    }
    query
        .order((name.asc(), id.asc()))
        .select(Employee::as_select())
        .load(conn)
}

/// Employees not assigned to any workstation, ordered by name.
pub fn list_unassigned_employees(
    conn: &mut SqliteConnection,
) -> Result<Vec<Employee>, diesel::result::Error> {
    use crate::schema::{employees, workstations};

    let assigned = workstations::table
        .filter(workstations::employee_id.is_not_null())
        .select(workstations::employee_id.assume_not_null());

    employees::table
        .filter(employees::id.ne_all(assigned))
        .order((employees::name.asc(), employees::id.asc()))
        .select(Employee::as_select())
        .load(conn)
}

/// Partially updates an employee.
pub fn update_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
    request: UpdateEmployeeRequest,
    actor: Option<&Actor>,
) -> Result<Employee, PamError> {
    use crate::schema::employees::dsl::*;

    let new_name = request.name.as_deref().map(validate_employee_name).transpose()?;

    conn.transaction(|conn| {
        let current = get_employee(conn, employee_id)?
            .ok_or_else(|| PamError::not_found("Employee", employee_id))?;

        let mut changes = Vec::new();
        if let Some(n) = &new_name
            && *n != current.name
        {
            changes.push(format!("name: {} -> {}", current.name, n));
        }
        if let Some(s) = request.sector
            && s != current.sector
        {
            changes.push(format!("sector: {} -> {}", current.sector, s));
        }

        diesel::update(employees.filter(id.eq(employee_id)))
            .set((
                name.eq(new_name.clone().unwrap_or(current.name.clone())),
                sector.eq(request.sector.unwrap_or(current.sector)),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        let employee = employees
            .filter(id.eq(employee_id))
            .select(Employee::as_select())
            .first(conn)?;

        log_change(
            conn,
            actor,
            EntityType::Employee,
            employee.id,
            &employee.name,
            ActionType::Update,
            changes.join("; "),
        )?;
        Ok(employee)
    })
}

/// Moves an employee to another sector without writing a separate change
/// log row. Used when a workstation assignment drags the sector along.
pub(crate) fn sync_employee_sector(
    conn: &mut SqliteConnection,
    employee_id: i32,
    new_sector: Sector,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::employees::dsl::*;

    let updated = diesel::update(
        employees
            .filter(id.eq(employee_id))
            .filter(sector.ne(new_sector)),
    )
    .set((sector.eq(new_sector), updated_at.eq(Utc::now().naive_utc())))
    .execute(conn)?;
    Ok(updated > 0)
}

/// Deletes an employee.
///
/// Their workstations are released and re-derived to UNOCCUPIED and their
/// position history is removed, all in one transaction.
pub fn delete_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
    actor: Option<&Actor>,
) -> Result<(), PamError> {
    use crate::schema::employees::dsl::*;

    conn.transaction(|conn| {
        let employee = get_employee(conn, employee_id)?
            .ok_or_else(|| PamError::not_found("Employee", employee_id))?;

        let released = release_employee(conn, employee_id, actor)?;
        delete_history_for_employee(conn, employee_id)?;
        diesel::delete(employees.filter(id.eq(employee_id))).execute(conn)?;

        let description = if released.is_empty() {
            String::new()
        } else {
            let names: Vec<String> = released
                .iter()
                .map(|ws| format!("{}-{}", ws.category, ws.sequence))
                .collect();
            format!("Released workstations {}", names.join(", "))
        };
        log_change(
            conn,
            actor,
            EntityType::Employee,
            employee.id,
            &employee.name,
            ActionType::Delete,
            description,
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChangeLogFilter, WorkstationChanges, WorkstationInput, WorkstationStatus};
    use crate::orm::change_log::list_changes;
    use crate::orm::position_history::history_for_workstation;
    use crate::orm::testing::setup_test_db;
    use crate::orm::workstation::{get_workstation, insert_workstation, update_workstation};

    fn add(conn: &mut SqliteConnection, employee_name: &str, s: Option<Sector>) -> Employee {
        insert_employee(
            conn,
            EmployeeInput {
                name: employee_name.to_string(),
                sector: s,
            },
            None,
        )
        .expect("insert employee")
    }

    #[test]
    fn test_insert_defaults_and_trims() {
        let mut conn = setup_test_db();
        let employee = add(&mut conn, "  Maria Silva  ", None);
        assert_eq!(employee.name, "Maria Silva");
        assert_eq!(employee.sector, Sector::Inss);

        let fetched = get_employee(&mut conn, employee.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Maria Silva");
    }

    #[test]
    fn test_name_validation() {
        let mut conn = setup_test_db();
        let empty = insert_employee(
            &mut conn,
            EmployeeInput {
                name: "   ".to_string(),
                sector: None,
            },
            None,
        );
        assert!(matches!(empty, Err(PamError::Validation(_))));

        let long = insert_employee(
            &mut conn,
            EmployeeInput {
                name: "x".repeat(EMPLOYEE_NAME_MAX_LEN + 1),
                sector: None,
            },
            None,
        );
        assert!(matches!(long, Err(PamError::Validation(_))));

        let exact = "y".repeat(EMPLOYEE_NAME_MAX_LEN);
        assert_eq!(add(&mut conn, &exact, None).name, exact);
    }

    #[test]
    fn test_list_orders_by_name_and_filters() {
        let mut conn = setup_test_db();
        add(&mut conn, "Carla", Some(Sector::SiapeLeo));
        add(&mut conn, "ana", Some(Sector::Inss));
        add(&mut conn, "Bruno", Some(Sector::SiapeLeo));

        let all = list_employees(&mut conn, &EmployeeFilter::default()).unwrap();
        let names: Vec<&str> = all.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno", "Carla", "ana"]);

        let leo = list_employees(
            &mut conn,
            &EmployeeFilter {
                sector: Some(Sector::SiapeLeo),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(leo.len(), 2);

        let search = list_employees(
            &mut conn,
            &EmployeeFilter {
                search: Some("AN".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let names: Vec<&str> = search.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ana"]);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let mut conn = setup_test_db();
        add(&mut conn, "Ana_Maria", None);
        add(&mut conn, "AnaXMaria", None);

        let search = |conn: &mut SqliteConnection, term: &str| -> Vec<String> {
            list_employees(
                conn,
                &EmployeeFilter {
                    search: Some(term.to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect()
        };

        assert_eq!(search(&mut conn, "a_m"), vec!["Ana_Maria"]);
        assert!(search(&mut conn, "%").is_empty());
    }

    #[test]
    fn test_update_employee_logs_changes() {
        let mut conn = setup_test_db();
        let employee = add(&mut conn, "Ana", None);
        let updated = update_employee(
            &mut conn,
            employee.id,
            UpdateEmployeeRequest {
                name: Some("Ana Paula".to_string()),
                sector: Some(Sector::Estagio),
            },
            Some(&Actor::system("tester")),
        )
        .unwrap();
        assert_eq!(updated.name, "Ana Paula");
        assert_eq!(updated.sector, Sector::Estagio);

        let logs = list_changes(
            &mut conn,
            &ChangeLogFilter {
                entity_type: Some(EntityType::Employee),
                action_type: Some(ActionType::Update),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].username, "tester");
        assert!(logs[0].description.contains("Ana -> Ana Paula"));
    }

    #[test]
    fn test_update_missing_employee() {
        let mut conn = setup_test_db();
        let result = update_employee(&mut conn, 99, UpdateEmployeeRequest::default(), None);
        assert!(matches!(result, Err(PamError::NotFound(_))));
    }

    #[test]
    fn test_delete_releases_workstations() {
        let mut conn = setup_test_db();
        let employee = add(&mut conn, "Ana", Some(Sector::Inss));
        let ws = insert_workstation(
            &mut conn,
            WorkstationInput {
                category: Some(Sector::Inss),
                employee_id: Some(employee.id),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(ws.status, WorkstationStatus::Occupied);

        delete_employee(&mut conn, employee.id, None).unwrap();

        assert!(get_employee(&mut conn, employee.id).unwrap().is_none());
        let ws = get_workstation(&mut conn, ws.id).unwrap().unwrap();
        assert_eq!(ws.employee_id, None);
        assert_eq!(ws.status, WorkstationStatus::Unoccupied);
        assert!(history_for_workstation(&mut conn, ws.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_keeps_maintenance_workstation_consistent() {
        let mut conn = setup_test_db();
        let employee = add(&mut conn, "Ana", Some(Sector::Inss));
        let ws = insert_workstation(
            &mut conn,
            WorkstationInput {
                category: Some(Sector::Inss),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        update_workstation(
            &mut conn,
            ws.id,
            WorkstationChanges {
                employee_id: Some(Some(employee.id)),
                monitor: Some(false),
                ..Default::default()
            },
            None,
        )
        .unwrap();

        delete_employee(&mut conn, employee.id, None).unwrap();
        let ws = get_workstation(&mut conn, ws.id).unwrap().unwrap();
        assert_eq!(ws.status, WorkstationStatus::Unoccupied);
    }

    #[test]
    fn test_unassigned_employees() {
        let mut conn = setup_test_db();
        let ana = add(&mut conn, "Ana", Some(Sector::Inss));
        add(&mut conn, "Bruno", Some(Sector::Inss));
        insert_workstation(
            &mut conn,
            WorkstationInput {
                category: Some(Sector::Inss),
                employee_id: Some(ana.id),
                ..Default::default()
            },
            None,
        )
        .unwrap();

        let free = list_unassigned_employees(&mut conn).unwrap();
        let names: Vec<&str> = free.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno"]);
    }

    #[test]
    fn test_delete_missing_employee() {
        let mut conn = setup_test_db();
        assert!(matches!(delete_employee(&mut conn, 5, None), Err(PamError::NotFound(_))));
    }
}
