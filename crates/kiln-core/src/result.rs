//! Result type alias for kiln operations

use crate::error::KilnError;

/// Standard Result type for kiln operations
pub type Result<T> = std::result::Result<T, KilnError>;
