use thiserror::Error;

pub type TmResult<T> = Result<T, TmError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TmError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Precondition violated: {what}")]
    Precondition { what: String },

    #[error("External provider failure: {message}")]
    External { message: String },
}
