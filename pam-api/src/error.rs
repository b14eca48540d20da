//! Domain error type shared by the ORM layer, the API and the admin CLI.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PamError {
    /// Input rejected before touching the database.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or referential integrity would be broken.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for PamError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => PamError::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                PamError::Conflict(format!("Duplicate value: {}", info.message()))
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                PamError::Conflict(format!("Referenced record conflict: {}", info.message()))
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                PamError::Validation(format!("Invalid value: {}", info.message()))
            }
            other => PamError::Database(other),
        }
    }
}

impl PamError {
    pub fn not_found(what: &str, id: i32) -> Self {
        PamError::NotFound(format!("{} with ID {} not found", what, id))
    }

    /// HTTP status used when the error reaches an API response.
    pub fn status(&self) -> Status {
        match self {
            PamError::Validation(_) => Status::BadRequest,
            PamError::NotFound(_) => Status::NotFound,
            PamError::Conflict(_) => Status::Conflict,
            PamError::Database(_) => Status::InternalServerError,
        }
    }
}
