//! Database operations for user authentication and session management.
//!
//! This module provides the login workflow: user lookup, password
//! verification, session creation and the session cookie. The functions are
//! generic over [`DbRunner`] so they run against both the Rocket pool and the
//! in-memory test connection.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use diesel::prelude::*;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use uuid::Uuid;

use crate::api::login::LoginRequest;
use crate::models::{NewSession, User};
use crate::orm::DbConn;
use crate::orm::testing::FakeDbConn;
use crate::schema::{sessions, users};

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "session";

/// Trait for abstracting database operations to support both production and testing.
///
/// This trait allows the same functions to work with both `DbConn` (production)
/// and `FakeDbConn` (testing) by providing a unified interface for database operations.
pub trait DbRunner {
    /// Executes a database operation with a connection.
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static;
}

impl DbRunner for DbConn {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        DbConn::run(self, f)
    }
}

impl<'a> DbRunner for FakeDbConn<'a> {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        FakeDbConn::run(self, f)
    }
}

fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}

/// Finds a user by username.
///
/// # Returns
/// * `Ok(Some(User))` - User found
/// * `Ok(None)` - No such user
/// * `Err(Status::InternalServerError)` - Database query failed
pub async fn find_user_by_username<D: DbRunner>(
    db: &D,
    username: &str,
) -> Result<Option<User>, Status> {
    let username = username.to_owned();
    db.run(move |conn| {
        users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(conn)
            .optional()
    })
    .await
    .map_err(|e| {
        error!("Database error looking up user: {}", e);
        Status::InternalServerError
    })
}

/// Verifies a password against a stored Argon2 hash. A malformed hash never
/// verifies.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

/// Creates a new session and stores it in the database.
///
/// # Returns
/// * `Ok(String)` - Session token that was created and stored
/// * `Err(Status::InternalServerError)` - Database insertion failed
pub async fn create_and_store_session<D: DbRunner>(db: &D, user_id: i32) -> Result<String, Status> {
    let session_token = generate_session_token();
    let now = Utc::now().naive_utc();

    let new_session = NewSession {
        id: session_token.clone(),
        user_id,
        created_at: now,
        expires_at: None,
        revoked: false,
    };

    db.run(move |conn| {
        diesel::insert_into(sessions::table)
            .values(&new_session)
            .execute(conn)
    })
    .await
    .map_err(|e| {
        error!("Failed to store session: {}", e);
        Status::InternalServerError
    })?;

    Ok(session_token)
}

/// Builds the session cookie: HTTP-only, SameSite=Lax and secure outside
/// tests.
fn session_cookie(session_token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_token.to_string()))
        .http_only(true)
        .secure(!cfg!(test))
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

fn set_session_cookie(cookies: &CookieJar<'_>, session_token: &str) {
    cookies.add(session_cookie(session_token));
}

/// Processes a complete login: validates input, finds the user, verifies
/// the password, creates a session and sets the session cookie.
///
/// # Returns
/// * `Ok(User)` - Login successful
/// * `Err(Status::BadRequest)` - Empty username or password
/// * `Err(Status::Unauthorized)` - Unknown user or wrong password
/// * `Err(Status::InternalServerError)` - Database operation failed
pub async fn process_login<D: DbRunner>(
    db: &D,
    cookies: &CookieJar<'_>,
    login: &LoginRequest,
) -> Result<User, Status> {
    if login.username.trim().is_empty() || login.password.trim().is_empty() {
        return Err(Status::BadRequest);
    }

    let user = match find_user_by_username(db, login.username.trim()).await? {
        Some(user) => user,
        None => return Err(Status::Unauthorized),
    };

    if !verify_password(&login.password, &user.password_hash) {
        return Err(Status::Unauthorized);
    }

    let session_token = create_and_store_session(db, user.id).await?;
    set_session_cookie(cookies, &session_token);

    Ok(user)
}

/// Hashes a password using Argon2 with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}
