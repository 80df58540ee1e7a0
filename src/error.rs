use thiserror::Error;

/// Problems with user-supplied input, raised before anything touches the database.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("no company provided")]
    MissingCompany,

    #[error("no role provided")]
    MissingRole,

    #[error("{field} date in invalid format: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("short date in invalid format (expected D.M[.Y]): {0}")]
    InvalidShortDate(String),

    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
}
