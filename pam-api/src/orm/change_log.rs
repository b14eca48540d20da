use diesel::prelude::*;

use crate::models::{ActionType, Actor, ChangeLog, ChangeLogFilter, EntityType, NewChangeLog};

/// Default number of rows returned by [`list_changes`].
pub const DEFAULT_CHANGE_LIMIT: i64 = 100;

const ANONYMOUS: &str = "system";

/// Appends an audit row.
///
/// Call inside the same transaction as the change it describes so both
/// commit or roll back together.
pub fn log_change(
    conn: &mut SqliteConnection,
    actor: Option<&Actor>,
    entity: EntityType,
    entity_id_val: i32,
    entity_name_val: &str,
    action: ActionType,
    description_val: impl Into<String>,
) -> Result<ChangeLog, diesel::result::Error> {
    use crate::schema::change_logs::dsl::*;

    let new_entry = NewChangeLog {
        user_id: actor.and_then(|a| a.user_id),
        username: actor
            .map(|a| a.username.clone())
            .unwrap_or_else(|| ANONYMOUS.to_string()),
        entity_type: entity,
        entity_id: entity_id_val,
        entity_name: entity_name_val.to_string(),
        action_type: action,
        description: description_val.into(),
        timestamp: None,
    };

    diesel::insert_into(change_logs).values(&new_entry).execute(conn)?;

    change_logs
        .order(id.desc())
        .select(ChangeLog::as_select())
        .first(conn)
}

/// Lists audit rows, newest first. The limit is at least one row.
pub fn list_changes(
    conn: &mut SqliteConnection,
    filter: &ChangeLogFilter,
) -> Result<Vec<ChangeLog>, diesel::result::Error> {
    use crate::schema::change_logs::dsl::*;

    let mut query = change_logs.into_boxed();
    if let Some(kind) = filter.entity_type {
        query = query.filter(entity_type.eq(kind));
    }
    if let Some(eid) = filter.entity_id {
        query = query.filter(entity_id.eq(eid));
    }
    if let Some(action) = filter.action_type {
        query = query.filter(action_type.eq(action));
    }
    if let Some(uid) = filter.user_id {
        query = query.filter(user_id.eq(uid));
    }

    query
        .order((timestamp.desc(), id.desc()))
        .limit(filter.limit.unwrap_or(DEFAULT_CHANGE_LIMIT).max(1))
        .select(ChangeLog::as_select())
        .load(conn)
}

/// Full history of one entity, oldest first.
pub fn history_for(
    conn: &mut SqliteConnection,
    entity: EntityType,
    entity_id_val: i32,
) -> Result<Vec<ChangeLog>, diesel::result::Error> {
    use crate::schema::change_logs::dsl::*;

    change_logs
        .filter(entity_type.eq(entity))
        .filter(entity_id.eq(entity_id_val))
        .order((timestamp.asc(), id.asc()))
        .select(ChangeLog::as_select())
        .load(conn)
}
