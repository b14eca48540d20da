use diesel::{Associations, Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::models::{Role, User};
use crate::schema::user_roles;

#[derive(Queryable, Associations, Debug, Serialize)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(belongs_to(Role, foreign_key = role_id))]
#[diesel(table_name = user_roles)]
#[diesel(primary_key(user_id, role_id))]
pub struct UserRole {
    pub user_id: i32,
    pub role_id: i32,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = user_roles)]
pub struct NewUserRole {
    pub user_id: i32,
    pub role_id: i32,
}
