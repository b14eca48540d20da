use std::io::{self, Write};

use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use pam_api::models::{ROLE_STAFF, User, UserInput};
use pam_api::orm::login::hash_password;
use pam_api::orm::role::get_role_by_name;
use pam_api::orm::user::{
    delete_user, get_user_by_username, insert_user, list_all_users_with_roles, update_password_hash,
};
use pam_api::orm::user_role::assign_user_role_by_name;
use rpassword::read_password;

use crate::admin_cli::utils::{SearchTerm, confirm};

#[derive(Subcommand)]
pub enum UserAction {
    #[command(about = "List users, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
    #[command(about = "Add a new user")]
    Add {
        #[arg(short, long, help = "Username")]
        username: String,
        #[arg(short, long, help = "Password (will be prompted securely if not provided)")]
        password: Option<String>,
        #[arg(
            short,
            long = "role",
            help = "Role to grant (staff or superuser); repeat for several, defaults to staff"
        )]
        roles: Vec<String>,
    },
    #[command(about = "Remove users matching search term")]
    Rm {
        #[arg(
            help = "Search term to match users for removal (regex by default, use -F for fixed string)"
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
    #[command(about = "Change user password")]
    Passwd {
        #[arg(short, long, help = "Username")]
        username: String,
        #[arg(short, long, help = "New password (will be prompted securely if not provided)")]
        password: Option<String>,
    },
}

pub fn handle_user_command_with_conn(
    conn: &mut SqliteConnection,
    action: UserAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Ls {
            search_term,
            fixed_string,
        } => {
            list_users_impl(conn, search_term, fixed_string)?;
        }
        UserAction::Add {
            username,
            password,
            roles,
        } => {
            add_user_impl(conn, &username, password, roles)?;
        }
        UserAction::Rm {
            search_term,
            fixed_string,
            yes,
        } => {
            remove_users_impl(conn, search_term, fixed_string, yes)?;
        }
        UserAction::Passwd { username, password } => {
            change_password_impl(conn, &username, password)?;
        }
    }
    Ok(())
}

pub fn add_user_impl(
    conn: &mut SqliteConnection,
    username: &str,
    password: Option<String>,
    roles: Vec<String>,
) -> Result<User, Box<dyn std::error::Error>> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username cannot be empty".into());
    }
    if get_user_by_username(conn, username)?.is_some() {
        return Err(format!("User '{}' already exists", username).into());
    }

    let roles = if roles.is_empty() {
        vec![ROLE_STAFF.to_string()]
    } else {
        roles
    };
    for role in &roles {
        if get_role_by_name(conn, role)?.is_none() {
            return Err(format!("Role '{}' does not exist", role).into());
        }
    }

    let password = match password {
        Some(p) => p,
        None => prompt_for_password()?,
    };
    let password_hash =
        hash_password(&password).map_err(|e| format!("Failed to hash password: {}", e))?;

    let user = insert_user(
        conn,
        UserInput {
            username: username.to_string(),
            password_hash,
        },
    )?;
    for role in &roles {
        assign_user_role_by_name(conn, user.id, role)?;
    }

    println!("User created successfully!");
    println!("ID: {}", user.id);
    println!("Username: {}", user.username);
    println!("Roles: {}", roles.join(", "));
    Ok(user)
}

pub fn change_password_impl(
    conn: &mut SqliteConnection,
    username: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = get_user_by_username(conn, username)?
        .ok_or_else(|| format!("User '{}' not found", username))?;

    let password = match password {
        Some(p) => p,
        None => prompt_for_password()?,
    };
    let password_hash =
        hash_password(&password).map_err(|e| format!("Failed to hash password: {}", e))?;

    update_password_hash(conn, user.id, password_hash)?;
    println!("Password updated successfully for user: {}", user.username);
    Ok(())
}

pub fn list_users_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let term = SearchTerm::new(search_term, fixed_string)?;
    let users = term.filter(list_all_users_with_roles(conn)?, |u| u.username.as_str());

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("Users:");
    for user in users {
        let roles: Vec<&str> = user.roles.iter().map(|r| r.name.as_str()).collect();
        println!(
            "  ID: {}, Username: {}, Roles: {}",
            user.id,
            user.username,
            roles.join(", ")
        );
    }
    Ok(())
}

pub fn remove_users_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let term = SearchTerm::new(Some(search_term), fixed_string)?;
    let users = term.filter(list_all_users_with_roles(conn)?, |u| u.username.as_str());

    if users.is_empty() {
        println!("No users found matching the search term.");
        return Ok(0);
    }

    println!("Found {} user(s) matching the search term:", users.len());
    for user in &users {
        println!("  ID: {}, Username: {}", user.id, user.username);
    }

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete these {} user(s)?",
            users.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    for user in users {
        if delete_user(conn, user.id)? > 0 {
            deleted_count += 1;
            println!("Deleted user: {} (ID: {})", user.username, user.id);
        }
    }
    println!("Successfully deleted {} user(s).", deleted_count);
    Ok(deleted_count)
}

pub fn prompt_for_password() -> Result<String, Box<dyn std::error::Error>> {
    print!("Enter new password: ");
    io::stdout().flush()?;
    let password = read_password()?;

    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    print!("Confirm new password: ");
    io::stdout().flush()?;
    let confirm_password = read_password()?;

    if password != confirm_password {
        return Err("Passwords do not match".into());
    }

    Ok(password)
}
