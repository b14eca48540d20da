//! Test harness shared by unit tests and the integration tests in `tests/`.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};
use uuid::Uuid;

use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use crate::admin_init_fairing::admin_init_fairing;
use crate::models::{ROLE_STAFF, ROLE_SUPERUSER, UserInput};
use crate::orm::login::hash_password;
use crate::orm::user::{get_user_by_username, insert_user};
use crate::orm::user_role::assign_user_role_by_name;

/// Users created for every test server, as `(username, password, roles)`.
pub const TEST_USERS: &[(&str, &str, &[&str])] = &[
    ("superuser", "superpass", &[ROLE_SUPERUSER]),
    ("staff", "staffpass", &[ROLE_STAFF]),
    ("both", "bothpass", &[ROLE_SUPERUSER, ROLE_STAFF]),
];

/// Configures SQLite for speed over durability. Only for tests.
fn set_sqlite_test_pragmas(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = MEMORY; -- rollbacks need a journal
        "#,
    )
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let Some(conn) = DbConn::get_one(&rocket).await else {
            return Err(rocket);
        };
        match conn.run(set_sqlite_test_pragmas).await {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("[test-data-init] Failed to set pragmas: {}", e);
                Err(rocket)
            }
        }
    })
}

/// Creates the users in [`TEST_USERS`] unless they already exist.
fn create_test_data(conn: &mut SqliteConnection) -> Result<(), Box<dyn std::error::Error>> {
    for (username, password, roles) in TEST_USERS {
        if get_user_by_username(conn, username)?.is_some() {
            continue;
        }
        let user = insert_user(
            conn,
            UserInput {
                username: username.to_string(),
                password_hash: hash_password(password).map_err(|e| e.to_string())?,
            },
        )?;
        for role in roles.iter() {
            assign_user_role_by_name(conn, user.id, role)?;
        }
        info!("[test-data-init] Created user '{}' with roles {:?}", username, roles);
    }
    Ok(())
}

fn test_data_init_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Test Data Initialization", |rocket| async {
        let Some(conn) = DbConn::get_one(&rocket).await else {
            return Err(rocket);
        };
        match conn.run(|c| create_test_data(c).map_err(|e| e.to_string())).await {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("[test-data-init] Failed to create test data: {}", e);
                Err(rocket)
            }
        }
    })
}

/// Creates a Rocket instance backed by a fresh in-memory SQLite database.
///
/// The instance has foreign keys enabled, migrations applied, the default
/// administrator and the [`TEST_USERS`] created and all API routes mounted.
/// Every call gets its own database.
pub fn test_rocket() -> Rocket<Build> {
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment().merge(("databases", map!["sqlite_db" => db_config]));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .attach(admin_init_fairing())
        .attach(test_data_init_fairing());

    crate::register_catchers(crate::mount_api_routes(rocket))
}

/// Opens a new in-memory database with foreign keys on and all migrations
/// applied. Each call returns an independent database.
pub fn setup_test_db() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn).expect("Failed to enable foreign keys");
    run_pending_migrations(&mut conn).expect("Failed to run migrations");
    conn
}

/// Async wrapper around a borrowed connection, for code written against
/// the `.run()` interface of [`DbConn`].
pub struct FakeDbConn<'a>(pub &'a mut SqliteConnection);

impl<'a> FakeDbConn<'a> {
    /// Runs `f` with the wrapped connection.
    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        // Safety: the wrapper holds the only mutable borrow of the connection
        // and `f` runs to completion before returning.
        unsafe {
            let conn_ptr = self.0 as *const SqliteConnection as *mut SqliteConnection;
            f(&mut *conn_ptr)
        }
    }
}

pub fn setup_test_dbconn(conn: &mut SqliteConnection) -> FakeDbConn<'_> {
    FakeDbConn(conn)
}
