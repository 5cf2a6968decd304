use guardian_core_db::repository::RepositoryError;
use heapless::String as HeaplessString;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use std::str::FromStr;

/// Edge table index allowing a single primary guardian per student.
pub const ONE_PRIMARY_INDEX: &str = "guardian_student_one_primary_idx";

/// Edge table primary key on `(guardian_id, student_id)`.
pub const EDGE_PRIMARY_KEY: &str = "guardian_student_pkey";

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<HeaplessString<N>, Box<dyn Error + Send + Sync>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s).map_err(|_| {
        format!("Value for column '{col_name}' is too long (max {N} chars)").into()
    })
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<Option<HeaplessString<N>>, Box<dyn Error + Send + Sync>> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(&val))
        .transpose()
        .map_err(|_| {
            format!("Value for column '{col_name}' is too long (max {N} chars)").into()
        })
}

/// SQLSTATE and constraint name of a database error, if it is one.
pub fn database_error_code(err: &sqlx::Error) -> Option<(String, Option<String>)> {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| (code.into_owned(), db_err.constraint().map(str::to_string))),
        _ => None,
    }
}

/// Classifies a sqlx error for the edge store.
///
/// Serialization failures, deadlocks, second primaries and violations raised by
/// the deferred invariant trigger all mean another session won the race.
pub fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match database_error_code(&err) {
        Some((code, _)) if code == "40001" || code == "40P01" || code == "23000" => {
            RepositoryError::Conflict(err.to_string())
        }
        Some((code, Some(constraint))) if code == "23505" && constraint == ONE_PRIMARY_INDEX => {
            RepositoryError::Conflict(err.to_string())
        }
        _ => RepositoryError::Backend(Box::new(err)),
    }
}
