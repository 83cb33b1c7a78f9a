use integral_enum::integral_enum;
use thiserror::Error;

/// Rejected identifier range.
#[derive(Error)]
#[integral_enum]
pub enum RangeError {
    #[error("range start is not a valid identifier")]
    InvalidStart,

    #[error("range end is not a valid identifier")]
    InvalidEnd,

    #[error("range start must be strictly less than its end")]
    Empty,
}

#[derive(Error)]
#[integral_enum]
pub enum IdParseError {
    #[error("identifier is not an unsigned integer")]
    NotANumber,

    #[error("identifier is out of the valid range")]
    OutOfRange,
}
