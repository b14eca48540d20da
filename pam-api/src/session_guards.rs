//! Session-based authentication and authorization guards for Rocket routes.
//!
//! [`AuthenticatedUser`] validates the `session` cookie and loads the user
//! with their roles. The role guards build on it:
//!
//! ```rust,ignore
//! use pam_api::session_guards::{StaffUser, SuperUser};
//!
//! #[get("/office/admin")]
//! fn office_admin(user: StaffUser) -> String {
//!     format!("Editing as {}", user.user.username)
//! }
//!
//! #[delete("/Rooms/<id>")]
//! fn remove_room(user: SuperUser, id: i32) { /* ... */ }
//! ```
//!
//! A missing or invalid session yields 401; an authenticated user without
//! the required role yields 403.

use chrono::Utc;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::DbConn;
use crate::models::{Actor, ROLE_STAFF, ROLE_SUPERUSER, Role, Session, User};
use crate::orm::login::SESSION_COOKIE;
use crate::orm::user_role::get_user_roles;
use crate::schema::{sessions, users};

/// A request guard for routes that require an authenticated user.
///
/// The guard performs the following checks:
///
/// 1. Extracts the session cookie from the request
/// 2. Finds a matching session that is neither revoked nor expired
/// 3. Retrieves the associated user
/// 4. Loads the user's roles and requires at least one
///
/// # Returns
///
/// - `Outcome::Success(AuthenticatedUser)` if authentication succeeds
/// - `Outcome::Error(Status::Unauthorized)` if authentication fails or user has no roles
/// - `Outcome::Error(Status::InternalServerError)` if database connection fails
#[derive(Debug)]
pub struct AuthenticatedUser {
    /// The authenticated user from the database
    pub user: User,
    /// All roles assigned to the user
    pub roles: Vec<Role>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = match request.guard::<DbConn>().await {
            Outcome::Success(db) => db,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        let session_id = match request.cookies().get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let session_result = db
            .run(move |conn| {
                sessions::table
                    .filter(sessions::id.eq(&session_id))
                    .filter(sessions::revoked.eq(false))
                    .filter(
                        sessions::expires_at
                            .is_null()
                            .or(sessions::expires_at.gt(Utc::now().naive_utc())),
                    )
                    .first::<Session>(conn)
                    .optional()
            })
            .await;

        let session = match session_result {
            Ok(Some(sess)) => sess,
            Ok(None) => return Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error finding session: {:?}", e);
                return Outcome::Error((Status::Unauthorized, ()));
            }
        };

        let user_result = db
            .run(move |conn| {
                users::table
                    .filter(users::id.eq(session.user_id))
                    .select(User::as_select())
                    .first(conn)
                    .optional()
            })
            .await;

        let user = match user_result {
            Ok(Some(u)) => u,
            Ok(None) => return Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error finding user: {:?}", e);
                return Outcome::Error((Status::Unauthorized, ()));
            }
        };

        let user_id = user.id;
        let roles = match db.run(move |conn| get_user_roles(conn, user_id)).await {
            Ok(r) if r.is_empty() => return Outcome::Error((Status::Unauthorized, ())),
            Ok(r) => r,
            Err(e) => {
                error!("Database error finding user roles: {:?}", e);
                return Outcome::Error((Status::Unauthorized, ()));
            }
        };

        Outcome::Success(AuthenticatedUser { user, roles })
    }
}

impl AuthenticatedUser {
    /// Helper method to check if the user has any of the specified roles
    pub fn has_any_role(&self, role_names: &[&str]) -> bool {
        role_names.iter().any(|required| self.has_role(required))
    }

    /// Helper method to check if the user has a specific role
    pub fn has_role(&self, role_name: &str) -> bool {
        self.roles.iter().any(|r| r.name == role_name)
    }

    /// The user as recorded in the change log.
    pub fn actor(&self) -> Actor {
        Actor::user(self.user.id, self.user.username.clone())
    }
}

/// Macro to create role-specific request guards. The guard succeeds when
/// the user holds any of the listed roles.
macro_rules! create_role_guard {
    ($name:ident, [$($role:expr),+]) => {
        #[derive(Debug)]
        pub struct $name {
            pub user: User,
            pub roles: Vec<Role>,
        }

        impl $name {
            pub fn actor(&self) -> Actor {
                Actor::user(self.user.id, self.user.username.clone())
            }
        }

        #[rocket::async_trait]
        impl<'r> FromRequest<'r> for $name {
            type Error = ();

            async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
                let auth_user = match AuthenticatedUser::from_request(request).await {
                    Outcome::Success(user) => user,
                    Outcome::Error(e) => return Outcome::Error(e),
                    Outcome::Forward(f) => return Outcome::Forward(f),
                };

                if auth_user.has_any_role(&[$($role),+]) {
                    Outcome::Success($name {
                        user: auth_user.user,
                        roles: auth_user.roles,
                    })
                } else {
                    Outcome::Error((Status::Forbidden, ()))
                }
            }
        }
    };
}

// Requires the "superuser" role: full management of every entity.
create_role_guard!(SuperUser, [ROLE_SUPERUSER]);

// Requires "staff" or "superuser": office editing and read access.
create_role_guard!(StaffUser, [ROLE_STAFF, ROLE_SUPERUSER]);
