use diesel::prelude::*;
use dotenvy::dotenv;
use rocket::Rocket;
use rocket::fairing::AdHoc;

use crate::models::{ROLE_SUPERUSER, User, UserInput};
use crate::orm::DbConn;
use crate::orm::login::hash_password;
use crate::orm::user::{get_user_by_username, insert_user};
use crate::orm::user_role::assign_user_role_by_name;

/// Add the default superuser if needed.
///
/// Set the default username/password with the envars PAM_DEFAULT_USERNAME
/// and PAM_DEFAULT_PASSWORD.
pub fn admin_init_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Admin User Initialization", |rocket| async {
        dotenv().ok();

        let Some(conn) = get_db_connection(&rocket).await else {
            return Err(rocket);
        };

        let admin_username = get_admin_username();
        let admin_password = get_admin_password();
        let result = conn
            .run(move |c| create_admin_user_if_needed(c, &admin_username, &admin_password))
            .await;

        match result {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("[admin-init] FATAL: Admin user creation failed: {}", e);
                Err(rocket)
            }
        }
    })
}

async fn get_db_connection(rocket: &Rocket<rocket::Build>) -> Option<DbConn> {
    match DbConn::get_one(rocket).await {
        Some(conn) => Some(conn),
        None => {
            error!("[admin-init] ERROR: Could not get DB connection.");
            None
        }
    }
}

fn get_admin_username() -> String {
    std::env::var("PAM_DEFAULT_USERNAME").unwrap_or_else(|_| "admin".to_string())
}

fn get_admin_password() -> String {
    std::env::var("PAM_DEFAULT_PASSWORD").unwrap_or_else(|_| "admin".to_string())
}

fn create_admin_user_if_needed(
    c: &mut SqliteConnection,
    admin_username: &str,
    admin_password: &str,
) -> Result<(), String> {
    let existing = get_user_by_username(c, admin_username).map_err(|e| e.to_string())?;
    if existing.is_some() {
        info!("[admin-init] Admin user '{}' already exists", admin_username);
        return Ok(());
    }

    let passhash = hash_password(admin_password).map_err(|e| e.to_string())?;
    let user = create_admin_user(c, admin_username, passhash).map_err(|e| e.to_string())?;
    assign_user_role_by_name(c, user.id, ROLE_SUPERUSER).map_err(|e| {
        error!("[admin-init] ERROR assigning role: {:?}", e);
        e.to_string()
    })?;
    info!(
        "[admin-init] Assigned role '{}' to user '{}'",
        ROLE_SUPERUSER, admin_username
    );
    Ok(())
}

fn create_admin_user(
    c: &mut SqliteConnection,
    admin_username: &str,
    password_hash: String,
) -> Result<User, diesel::result::Error> {
    let admin_user = UserInput {
        username: admin_username.to_string(),
        password_hash,
    };

    match insert_user(c, admin_user) {
        Ok(user) => {
            info!("[admin-init] Created admin user: '{}'", admin_username);
            Ok(user)
        }
        Err(e) => {
            error!("[admin-init] ERROR creating admin user: {:?}", e);
            Err(e)
        }
    }
}
