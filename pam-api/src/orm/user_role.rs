use diesel::prelude::*;

use crate::models::{NewUserRole, Role};
use crate::orm::role::get_role_by_name;

/// Assigns a role to a user. Assigning a role twice is a no-op.
pub fn assign_user_role(
    conn: &mut SqliteConnection,
    user_id_param: i32,
    role_id_param: i32,
) -> Result<(), diesel::result::Error> {
    use crate::schema::user_roles::dsl::*;

    let new_user_role = NewUserRole {
        user_id: user_id_param,
        role_id: role_id_param,
    };

    diesel::insert_or_ignore_into(user_roles)
        .values(&new_user_role)
        .execute(conn)?;

    Ok(())
}

/// Assigns a role by name. Fails with `NotFound` for an unknown role.
pub fn assign_user_role_by_name(
    conn: &mut SqliteConnection,
    user_id_param: i32,
    role_name: &str,
) -> Result<(), diesel::result::Error> {
    let role = get_role_by_name(conn, role_name)?.ok_or(diesel::result::Error::NotFound)?;
    assign_user_role(conn, user_id_param, role.id)
}

/// Removes a role from a user
pub fn remove_user_role(
    conn: &mut SqliteConnection,
    user_id_param: i32,
    role_id_param: i32,
) -> Result<(), diesel::result::Error> {
    use crate::schema::user_roles::dsl::*;

    diesel::delete(
        user_roles
            .filter(user_id.eq(user_id_param))
            .filter(role_id.eq(role_id_param)),
    )
    .execute(conn)?;

    Ok(())
}

/// Gets all roles for a specific user
pub fn get_user_roles(
    conn: &mut SqliteConnection,
    user_id_param: i32,
) -> Result<Vec<Role>, diesel::result::Error> {
    use crate::schema::roles::dsl::*;
    use crate::schema::user_roles;

    roles
        .inner_join(user_roles::table.on(id.eq(user_roles::role_id)))
        .filter(user_roles::user_id.eq(user_id_param))
        .order(id.asc())
        .select((id, name, description))
        .load::<Role>(conn)
}

/// Checks if a user has a specific role by role name
pub fn user_has_role(
    conn: &mut SqliteConnection,
    user_id_param: i32,
    role_name: &str,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::roles::dsl::*;
    use crate::schema::user_roles;

    let count: i64 = roles
        .inner_join(user_roles::table.on(id.eq(user_roles::role_id)))
        .filter(user_roles::user_id.eq(user_id_param))
        .filter(name.eq(role_name))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}
