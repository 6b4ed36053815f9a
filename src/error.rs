use thiserror::Error;

/// Errors surfaced to callers. Almost everything else in the engine degrades
/// gracefully instead of failing; see the parser and instance resolution.
#[derive(Debug, Error)]
pub enum Error {
    /// An item was added while no frame is active.
    #[error("no active frame")]
    NoActiveFrame,
    /// Font source is missing one of the required structural markers.
    #[error("malformed font source: {0}")]
    MalformedFont(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
