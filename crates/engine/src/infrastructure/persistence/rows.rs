//! Column decoding helpers shared by the SQLite repositories.

use std::str::FromStr;

use lifesys_domain::DomainError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::infrastructure::ports::RepoError;

/// Reads a TEXT column and parses it with the type's `FromStr`.
pub(crate) fn parsed<T>(row: &SqliteRow, column: &str) -> Result<T, RepoError>
where
    T: FromStr<Err = DomainError>,
{
    let raw: String = row
        .try_get(column)
        .map_err(|e| RepoError::serialization(format!("{column}: {e}")))?;
    raw.parse()
        .map_err(|e: DomainError| RepoError::serialization(format!("{column}: {e}")))
}

pub(crate) fn parsed_opt<T>(row: &SqliteRow, column: &str) -> Result<Option<T>, RepoError>
where
    T: FromStr<Err = DomainError>,
{
    let raw: Option<String> = row
        .try_get(column)
        .map_err(|e| RepoError::serialization(format!("{column}: {e}")))?;
    raw.map(|value| {
        value
            .parse()
            .map_err(|e: DomainError| RepoError::serialization(format!("{column}: {e}")))
    })
    .transpose()
}

pub(crate) fn column<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| RepoError::serialization(format!("{column}: {e}")))
}

/// SQLite integers are signed; counters in the domain are not.
pub(crate) fn unsigned(row: &SqliteRow, name: &str) -> Result<u64, RepoError> {
    let value: i64 = column(row, name)?;
    u64::try_from(value)
        .map_err(|_| RepoError::serialization(format!("{name}: negative value {value}")))
}

pub(crate) fn to_sql_int(value: u64, name: &str) -> Result<i64, RepoError> {
    i64::try_from(value)
        .map_err(|_| RepoError::serialization(format!("{name}: {value} exceeds SQLite INTEGER")))
}

/// Maps unique/foreign key failures to `ConstraintViolation`, everything
/// else to `Database`.
pub(crate) fn write_error(operation: &'static str, err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() {
            return RepoError::constraint(db.message());
        }
    }
    RepoError::database(operation, err)
}
