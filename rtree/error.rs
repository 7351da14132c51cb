use thiserror::Error;

/// 索引操作的参数错误
#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("Max entries must be at least 2, got {0}")]
    InvalidCapacity(usize),

    #[error("k must be greater than 0")]
    InvalidK,

    #[error("Invalid rectangle: min {min:?} must not exceed max {max:?}")]
    InvalidRectangle { min: [f64; 2], max: [f64; 2] },

    #[error("Coordinates must be finite, got ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },
}
