//! Classification of low-level Diesel failures.
//!
//! The classifier only relabels: it never fails and never panics. Repository
//! adapters call [`classify`] and translate the outcome into their port error
//! straight away, so [`DbError`] never crosses the adapter boundary.
//!
//! PostgreSQL reports the offending key of a unique violation only inside the
//! free-text detail (`Key (email)=(ann@x.com) already exists.`). The two
//! patterns that pick it apart live here and nowhere else.

use std::fmt;
use std::sync::OnceLock;

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use regex::Regex;
use tracing::debug;

/// Recognised SQLSTATE classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlState {
    /// `23505`: a unique index rejected the row.
    UniqueViolation,
    /// `23502`: a required column was null.
    NotNullViolation,
    /// `23000` family: any other integrity constraint.
    IntegrityConstraintViolation,
}

impl SqlState {
    /// Five-character SQLSTATE code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::UniqueViolation => "23505",
            Self::NotNullViolation => "23502",
            Self::IntegrityConstraintViolation => "23000",
        }
    }

    fn from_kind(kind: &DatabaseErrorKind) -> Option<Self> {
        match kind {
            DatabaseErrorKind::UniqueViolation => Some(Self::UniqueViolation),
            DatabaseErrorKind::NotNullViolation => Some(Self::NotNullViolation),
            DatabaseErrorKind::ForeignKeyViolation | DatabaseErrorKind::CheckViolation => {
                Some(Self::IntegrityConstraintViolation)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured description of a recognised database failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbError {
    message: String,
    code: SqlState,
    detail: String,
    constraint: Option<String>,
}

impl DbError {
    /// Caller-facing description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// SQLSTATE class.
    pub fn code(&self) -> SqlState {
        self.code
    }

    /// Raw detail text reported by the server, empty when absent.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Name of the violated constraint, if reported.
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }
}

/// Outcome of classifying a failed statement.
#[derive(Debug)]
pub enum Classified<'a> {
    /// A database error with a recognised SQLSTATE.
    Database(DbError),
    /// A database error whose SQLSTATE is not recognised.
    Unrecognised,
    /// Not a database error at all; the caller handles it unchanged.
    PassThrough(&'a DieselError),
}

/// Classify the error of a statement result.
///
/// Returns `None` when the statement succeeded.
pub fn classify_result<T>(result: &Result<T, DieselError>) -> Option<Classified<'_>> {
    result.as_ref().err().map(classify)
}

/// Classify a Diesel error.
pub fn classify(error: &DieselError) -> Classified<'_> {
    let DieselError::DatabaseError(kind, info) = error else {
        return Classified::PassThrough(error);
    };
    debug!(
        ?kind,
        message = info.message(),
        detail = info.details(),
        constraint = info.constraint_name(),
        "classifying database error"
    );
    match SqlState::from_kind(kind) {
        Some(code) => Classified::Database(describe(code, &**info)),
        None => Classified::Unrecognised,
    }
}

fn describe(code: SqlState, info: &(dyn DatabaseErrorInformation + Send + Sync)) -> DbError {
    let detail = info.details().unwrap_or_default().to_owned();
    let message = match code {
        SqlState::UniqueViolation => unique_violation_message(&detail),
        SqlState::NotNullViolation => {
            let column = info
                .column_name()
                .map(str::to_owned)
                .unwrap_or_else(|| key_column(&detail));
            format!("Column ({column}) cannot be left blank")
        }
        SqlState::IntegrityConstraintViolation => info.message().to_owned(),
    };
    DbError {
        message,
        code,
        detail,
        constraint: info.constraint_name().map(str::to_owned),
    }
}

fn unique_violation_message(detail: &str) -> String {
    let column = key_column(detail);
    let value = key_value(detail);
    if column.is_empty() {
        format!("Col already contains value ({value})")
    } else {
        format!("Col ({column}) already contains value ({value})")
    }
}

fn key_column(detail: &str) -> String {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    first_capture(PATTERN.get_or_init(|| Regex::new(r"Key \((.+)\)=").ok()), detail)
}

fn key_value(detail: &str) -> String {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    first_capture(
        PATTERN.get_or_init(|| Regex::new(r"Key \(.+\)=\((.+)\)").ok()),
        detail,
    )
}

fn first_capture(pattern: &Option<Regex>, haystack: &str) -> String {
    pattern
        .as_ref()
        .and_then(|regex| regex.captures(haystack))
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str().to_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Default)]
    struct Info {
        message: &'static str,
        details: Option<&'static str>,
        column: Option<&'static str>,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }

        fn details(&self) -> Option<&str> {
            self.details
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("users")
        }

        fn column_name(&self) -> Option<&str> {
            self.column
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, info: Info) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(info))
    }

    fn expect_database(classified: Classified<'_>) -> DbError {
        match classified {
            Classified::Database(db) => db,
            other => panic!("expected database classification, got {other:?}"),
        }
    }

    #[rstest]
    fn unique_violation_names_column_and_value() {
        let error = database_error(
            DatabaseErrorKind::UniqueViolation,
            Info {
                message: "duplicate key value violates unique constraint \"users_email_key\"",
                details: Some("Key (email)=(ann@x.com) already exists."),
                constraint: Some("users_email_key"),
                ..Info::default()
            },
        );

        let db = expect_database(classify(&error));
        assert_eq!(db.code(), SqlState::UniqueViolation);
        assert_eq!(db.message(), "Col (email) already contains value (ann@x.com)");
        assert_eq!(db.detail(), "Key (email)=(ann@x.com) already exists.");
        assert_eq!(db.constraint(), Some("users_email_key"));
    }

    #[rstest]
    #[case("Key (email)=(ann@x.com) already exists.", "Col (email) already contains value (ann@x.com)")]
    #[case("Key ()=(ann@x.com) already exists.", "Col already contains value ()")]
    #[case("something unexpected", "Col already contains value ()")]
    #[case("", "Col already contains value ()")]
    fn unique_messages_tolerate_missing_parts(#[case] detail: &str, #[case] expected: &str) {
        assert_eq!(unique_violation_message(detail), expected);
    }

    #[rstest]
    #[case(Some("email"), None, "Column (email) cannot be left blank")]
    #[case(None, Some("Key (password)=(x)"), "Column (password) cannot be left blank")]
    #[case(None, None, "Column () cannot be left blank")]
    fn not_null_violation_names_column(
        #[case] column: Option<&'static str>,
        #[case] details: Option<&'static str>,
        #[case] expected: &str,
    ) {
        let error = database_error(
            DatabaseErrorKind::NotNullViolation,
            Info {
                message: "null value in column violates not-null constraint",
                details,
                column,
                ..Info::default()
            },
        );

        let db = expect_database(classify(&error));
        assert_eq!(db.code(), SqlState::NotNullViolation);
        assert_eq!(db.message(), expected);
    }

    #[rstest]
    #[case(DatabaseErrorKind::ForeignKeyViolation)]
    #[case(DatabaseErrorKind::CheckViolation)]
    fn other_integrity_violations_are_classified(#[case] kind: DatabaseErrorKind) {
        let error = database_error(
            kind,
            Info {
                message: "violates constraint",
                constraint: Some("users_status_check"),
                ..Info::default()
            },
        );

        let db = expect_database(classify(&error));
        assert_eq!(db.code(), SqlState::IntegrityConstraintViolation);
        assert_eq!(db.code().code(), "23000");
        assert_eq!(db.message(), "violates constraint");
    }

    #[rstest]
    #[case(DatabaseErrorKind::SerializationFailure)]
    #[case(DatabaseErrorKind::ClosedConnection)]
    #[case(DatabaseErrorKind::Unknown)]
    fn other_database_errors_are_unrecognised(#[case] kind: DatabaseErrorKind) {
        let error = database_error(kind, Info::default());
        assert!(matches!(classify(&error), Classified::Unrecognised));
    }

    #[rstest]
    fn non_database_errors_pass_through() {
        let error = DieselError::NotFound;
        match classify(&error) {
            Classified::PassThrough(inner) => assert!(matches!(inner, DieselError::NotFound)),
            other => panic!("expected pass-through, got {other:?}"),
        }
    }

    #[rstest]
    fn successful_results_are_not_classified() {
        let ok: Result<u8, DieselError> = Ok(1);
        assert!(classify_result(&ok).is_none());

        let failed: Result<u8, DieselError> = Err(DieselError::NotFound);
        assert!(matches!(
            classify_result(&failed),
            Some(Classified::PassThrough(_))
        ));
    }
}
