use thiserror::Error;

/// Errors reported by the single-value accessors of the collections.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The collection holds no values.
    #[error("can't get a value from an empty collection")]
    EmptyContainer,
    /// The collection holds more than the one value that was asked for.
    #[error("can't get the only value of a collection with multiple values")]
    MultipleValues,
}

/// A specialized [`Result`](core::result::Result) for this crate.
pub type Result<T> = core::result::Result<T, Error>;
