use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is required")]
    Validation(&'static str),

    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("note text cannot be empty")]
    EmptyNote,

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
