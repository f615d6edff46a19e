use thiserror::Error;

/// Result type alias for fallible map construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned when a map is configured with invalid parameters.
///
/// Lookups and removals never fail: a missing key is reported as `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The load factor is not a positive, finite number, or is outside the
    /// range a particular table layout supports.
    #[error("illegal load factor: {0}")]
    InvalidLoadFactor(f64),

    /// The requested capacity cannot be addressed by the table.
    #[error("illegal capacity: {requested} exceeds {max}")]
    CapacityOverflow { requested: usize, max: usize },
}
