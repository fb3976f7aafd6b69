//! Convenience result type alias for Garrison.

use crate::error::AppError;

/// A specialized `Result` type for Garrison operations.
pub type AppResult<T> = Result<T, AppError>;
