//! The error type for invalid inputs to the cost calculations.
use derive_more::{Display, Error};

/// Indicates that a calculation was given inputs which break one of its preconditions.
///
/// This is the only error raised by the cost calculations. It is deterministic, so there is no
/// point retrying an operation which produced it.
#[derive(Debug, Clone, PartialEq, Display, Error)]
#[display("Invalid input: {message}")]
pub struct InvalidInput {
    message: String,
}

impl InvalidInput {
    /// Create a new [`InvalidInput`] with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A description of the precondition which was violated
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Return early with an [`InvalidInput`] error if a condition is not satisfied.
///
/// This mirrors [`anyhow::ensure`] for functions which return `Result<_, InvalidInput>`.
macro_rules! ensure_valid {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::InvalidInput::new(format!($($arg)+)));
        }
    };
}
pub(crate) use ensure_valid;

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(x: f64) -> Result<f64, InvalidInput> {
        ensure_valid!(x > 0.0, "{x} is not positive");
        Ok(x)
    }

    #[test]
    fn test_ensure_valid() {
        assert_eq!(check_positive(1.0), Ok(1.0));
        assert_eq!(
            check_positive(-1.0).unwrap_err().message(),
            "-1 is not positive"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            InvalidInput::new("tax rate must be between 0 and 1").to_string(),
            "Invalid input: tax rate must be between 0 and 1"
        );
    }
}
