use thiserror::Error;

/// The error returned by [`Map::at`](crate::Map::at) and
/// [`Map::at_mut`](crate::Map::at_mut) when the key is absent.
///
/// All other lookup methods signal "not found" through `Option` or a zero
/// count instead of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested key is not present in the map.
    #[error("key not found")]
    KeyNotFound,
}
