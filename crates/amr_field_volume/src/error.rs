use thiserror::Error;

/// A brick descriptor disagrees with the payload array it references. Surfaced while
/// materializing an `AmrField`; malformed static input cannot be retried.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MalformedInputError {
    #[error(
        "brick {brick}: payload slice [{offset}..{offset}+{len}] is out of range of a data array \
         of length {data_len}"
    )]
    PayloadOutOfRange {
        brick: usize,
        offset: usize,
        len: usize,
        data_len: usize,
    },

    #[error("brick {brick}: index box implies {expected} cells but the descriptor claims {actual}")]
    CellCountMismatch {
        brick: usize,
        expected: usize,
        actual: usize,
    },

    #[error("brick {brick}: index box contains no cells")]
    EmptyBrick { brick: usize },

    #[error("brick {brick}: cell width must be positive, got {width}")]
    NonPositiveCellWidth { brick: usize, width: f32 },

    #[error("brick {brick}: refinement level must be non-negative, got {level}")]
    NegativeLevel { brick: usize, level: i32 },
}

/// The field cannot support a spatial index. Surfaced by `AmrAccel::new`.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum EmptyFieldError {
    #[error("cannot build an index over a field with no bricks")]
    NoBricks,

    #[error("cannot build an index over a field with no root-level (level 0) bricks")]
    NoRootBricks,
}

/// An unrecognized sampling method name. Surfaced at configuration time, before any sampling
/// occurs.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(
    "cannot parse sampling method '{0}'; expected one of \"finest\", \"finestLevel\", \
     \"current\", \"currentLevel\", or \"octant\""
)]
pub struct ConfigurationError(pub String);
