use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::Args;
use diesel::sqlite::SqliteConnection;
use pam_api::models::{ActionType, ChangeLog, ChangeLogFilter, EntityType};
use pam_api::orm::change_log::{DEFAULT_CHANGE_LIMIT, list_changes};

/// Show recent change log entries, newest first
#[derive(Debug, Args)]
pub struct LogArgs {
    #[arg(short = 't', long, help = "EMPLOYEE, ROOM, ISLAND or WORKSTATION")]
    pub entity_type: Option<EntityType>,
    #[arg(short = 'i', long, help = "Entity ID (use together with --entity-type)")]
    pub entity_id: Option<i32>,
    #[arg(short, long, help = "CREATE, UPDATE or DELETE")]
    pub action: Option<ActionType>,
    #[arg(short = 'n', long, default_value_t = DEFAULT_CHANGE_LIMIT, help = "Maximum number of entries")]
    pub limit: i64,
    #[arg(
        short,
        long,
        help = "Only entries at or after this time (YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or 'today')"
    )]
    pub since: Option<String>,
}

pub fn handle_log_command_with_conn(
    conn: &mut SqliteConnection,
    args: LogArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = log_entries(conn, &args)?;

    if entries.is_empty() {
        println!("No change log entries found.");
        return Ok(());
    }

    for entry in entries {
        let description = if entry.description.is_empty() {
            String::new()
        } else {
            format!(": {}", entry.description)
        };
        println!(
            "{} {} {} #{} \"{}\" by {}{}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.action_type,
            entry.entity_type,
            entry.entity_id,
            entry.entity_name,
            entry.username,
            description
        );
    }
    Ok(())
}

pub fn log_entries(
    conn: &mut SqliteConnection,
    args: &LogArgs,
) -> Result<Vec<ChangeLog>, Box<dyn std::error::Error>> {
    if args.limit < 1 {
        return Err("--limit must be at least 1".into());
    }
    let since = args.since.as_deref().map(parse_timestamp).transpose()?;

    let filter = ChangeLogFilter {
        entity_type: args.entity_type,
        entity_id: args.entity_id,
        action_type: args.action,
        user_id: None,
        limit: Some(args.limit),
    };
    let entries = list_changes(conn, &filter)?;

    Ok(match since {
        Some(since) => entries.into_iter().filter(|e| e.timestamp >= since).collect(),
        None => entries,
    })
}

fn parse_timestamp(timestamp_str: &str) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for format in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp_str, format) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(timestamp_str, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
    }

    if timestamp_str.to_lowercase() == "today" {
        return Ok(Utc::now().date_naive().and_hms_opt(0, 0, 0).unwrap_or_default());
    }

    Err(format!(
        "Unable to parse timestamp '{}'. Use format: YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or 'today'",
        timestamp_str
    )
    .into())
}
