use chrono::Utc;
use diesel::prelude::*;

use crate::models::{NewUser, User, UserInput, UserWithRoles};
use crate::orm::user_role::get_user_roles;

/// Inserts a new user. The password must already be hashed.
pub fn insert_user(
    conn: &mut SqliteConnection,
    new_user: UserInput,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let insertable_user = NewUser {
        username: new_user.username,
        password_hash: new_user.password_hash,
    };

    diesel::insert_into(users)
        .values(&insertable_user)
        .execute(conn)?;

    users
        .order(id.desc())
        .select(User::as_select())
        .first(conn)
}

pub fn get_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .filter(id.eq(user_id))
        .select(User::as_select())
        .first(conn)
        .optional()
}

pub fn get_user_by_username(
    conn: &mut SqliteConnection,
    user_name: &str,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .filter(username.eq(user_name))
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Returns all users ordered by username.
pub fn list_all_users(conn: &mut SqliteConnection) -> Result<Vec<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .order(username.asc())
        .select(User::as_select())
        .load(conn)
}

/// Returns all users with their roles, ordered by username.
pub fn list_all_users_with_roles(
    conn: &mut SqliteConnection,
) -> Result<Vec<UserWithRoles>, diesel::result::Error> {
    let all = list_all_users(conn)?;
    let mut result = Vec::with_capacity(all.len());
    for user in all {
        let roles = get_user_roles(conn, user.id)?;
        result.push(UserWithRoles {
            id: user.id,
            username: user.username,
            roles,
        });
    }
    Ok(result)
}

/// Replaces a user's password hash.
pub fn update_password_hash(
    conn: &mut SqliteConnection,
    user_id: i32,
    new_hash: String,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    diesel::update(users.filter(id.eq(user_id)))
        .set((
            password_hash.eq(new_hash),
            updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)
}

/// Deletes a user. Sessions and role links go with it; change log rows
/// keep the username.
pub fn delete_user(conn: &mut SqliteConnection, user_id: i32) -> Result<usize, diesel::result::Error> {
    use crate::schema::{change_logs, sessions, user_roles, users};

    conn.transaction(|conn| {
        diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id))).execute(conn)?;
        diesel::delete(user_roles::table.filter(user_roles::user_id.eq(user_id))).execute(conn)?;
        diesel::update(change_logs::table.filter(change_logs::user_id.eq(user_id)))
            .set(change_logs::user_id.eq(None::<i32>))
            .execute(conn)?;
        diesel::delete(users::table.filter(users::id.eq(user_id))).execute(conn)
    })
}
