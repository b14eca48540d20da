use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::change_logs;

text_enum! {
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum EntityType {
        Employee => ("EMPLOYEE", "Funcionário"),
        Room => ("ROOM", "Sala"),
        Island => ("ISLAND", "Ilha"),
        Workstation => ("WORKSTATION", "Estação de Trabalho"),
    }
}

text_enum! {
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum ActionType {
        Create => ("CREATE", "Criação"),
        Update => ("UPDATE", "Alteração"),
        Delete => ("DELETE", "Exclusão"),
    }
}

/// Append-only audit row written by every mutating operation.
#[derive(
    Queryable, Selectable, Identifiable, QueryableByName, Debug, Clone, Serialize, Deserialize, TS,
)]
#[diesel(table_name = change_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct ChangeLog {
    pub id: i32,
    pub user_id: Option<i32>,
    pub username: String,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub entity_name: String,
    pub action_type: ActionType,
    pub description: String,
    #[ts(type = "string")]
    pub timestamp: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = change_logs)]
pub struct NewChangeLog {
    pub user_id: Option<i32>,
    pub username: String,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub entity_name: String,
    pub action_type: ActionType,
    pub description: String,
    pub timestamp: Option<NaiveDateTime>, // Optional to use database default
}

#[derive(Debug, Clone, Default)]
pub struct ChangeLogFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<i32>,
    pub action_type: Option<ActionType>,
    pub user_id: Option<i32>,
    pub limit: Option<i64>,
}

/// Who performed a change. Requests carry the logged-in user; the admin
/// CLI uses a named system actor without a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Option<i32>,
    pub username: String,
}

impl Actor {
    pub fn user(user_id: i32, username: impl Into<String>) -> Self {
        Actor {
            user_id: Some(user_id),
            username: username.into(),
        }
    }

    pub fn system(username: impl Into<String>) -> Self {
        Actor {
            user_id: None,
            username: username.into(),
        }
    }
}
