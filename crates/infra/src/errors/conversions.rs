//! Conversions from external infrastructure errors into domain errors.

use atlas_domain::AtlasError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AtlasError);

impl From<InfraError> for AtlasError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AtlasError> for InfraError {
    fn from(value: AtlasError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAtlasError {
    fn into_atlas(self) -> AtlasError;
}

/// Whether the error is a unique or primary key constraint violation.
///
/// `locations.name` is a TEXT PRIMARY KEY, so a duplicate insert surfaces as
/// extended code 1555 (primary key) rather than 2067 (unique index); both are
/// recognised here.
pub fn is_unique_violation(err: &SqlError) -> bool {
    use rusqlite::ffi::ErrorCode;

    matches!(
        err,
        SqlError::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
                && matches!(inner.extended_code, 1555 | 2067)
    )
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → AtlasError */
/* -------------------------------------------------------------------------- */

impl IntoAtlasError for SqlError {
    fn into_atlas(self) -> AtlasError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => AtlasError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        AtlasError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        AtlasError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        AtlasError::Database("foreign key constraint violation".into())
                    }
                    _ => AtlasError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => AtlasError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                AtlasError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                AtlasError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => AtlasError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                AtlasError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => {
                AtlasError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            RE::InvalidQuery => AtlasError::Database("invalid SQL query".into()),
            other => AtlasError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_atlas())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → AtlasError */
/* -------------------------------------------------------------------------- */

impl IntoAtlasError for r2d2::Error {
    fn into_atlas(self) -> AtlasError {
        AtlasError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_atlas())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AtlasError */
/* -------------------------------------------------------------------------- */

impl IntoAtlasError for HttpError {
    fn into_atlas(self) -> AtlasError {
        if self.is_timeout() {
            AtlasError::Network("request timed out".into())
        } else if self.is_connect() {
            AtlasError::Network(format!("connection failed: {self}"))
        } else if self.is_status() {
            let status = self
                .status()
                .map_or_else(|| "unknown".to_string(), |status| status.as_u16().to_string());
            AtlasError::RemoteApi(format!("HTTP {status}"))
        } else if self.is_decode() {
            AtlasError::RemoteApi(format!("failed to decode response body: {self}"))
        } else {
            AtlasError::Network(self.to_string())
        }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_atlas())
    }
}

/// Map a blocking task join failure.
pub fn map_join_error(err: tokio::task::JoinError) -> AtlasError {
    AtlasError::Internal(format!("Task join error: {err}"))
}

#[cfg(test)]
mod tests {
    use rusqlite::ffi::{Error as FfiError, ErrorCode};

    use super::*;

    fn constraint_error(extended_code: i32) -> SqlError {
        SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code },
            Some("constraint failed".into()),
        )
    }

    #[test]
    fn primary_key_and_unique_violations_are_recognised() {
        assert!(is_unique_violation(&constraint_error(1555)));
        assert!(is_unique_violation(&constraint_error(2067)));
        assert!(!is_unique_violation(&constraint_error(787)));
        assert!(!is_unique_violation(&SqlError::QueryReturnedNoRows));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let err: AtlasError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(err, AtlasError::NotFound(_)));
    }

    #[test]
    fn constraint_violation_maps_to_database() {
        let err: AtlasError = InfraError::from(constraint_error(1555)).into();
        assert!(matches!(err, AtlasError::Database(_)));
    }
}
