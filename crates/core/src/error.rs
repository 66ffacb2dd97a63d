use thiserror::Error;

/// Errors raised while decoding an [`Item`](crate::Item) from an untyped record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("item is missing `id`")]
    MissingId,

    #[error("item `id` is empty")]
    EmptyId,

    #[error("item `id` must be a string or number, got {0}")]
    InvalidId(&'static str),
}
