use thiserror::Error;

/// Failure reported by an index when a precondition does not hold.
///
/// Most variants are only produced in [`Validation::Checked`](crate::Validation) mode.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    #[error("point indexed twice")]
    DuplicateId,
    #[error("index not ready, call seal() after the last insert")]
    NotSealed,
    #[error("query distance must be finite and strictly positive")]
    InvalidDistance,
    #[error("point coordinates must be finite")]
    InvalidCoordinate,
    #[error("overflow while computing a squared distance")]
    Overflow,
    #[error("cell coordinate out of the representable range")]
    CellOverflow,
    #[error("grid step must be finite and strictly positive")]
    InvalidGridStep,
    #[error("k must be at least 1")]
    InvalidK,
    #[error("point position does not fit the id type")]
    IdOverflow,
}

pub type Result<T> = std::result::Result<T, IndexError>;
