pub mod deal;
pub mod error;
pub mod types;

#[cfg(feature = "presentation")]
pub mod presentation;

pub use error::DealError;
pub use types::*;

/// Standard result type for all ipo-deal operations
pub type DealResult<T> = Result<T, DealError>;
