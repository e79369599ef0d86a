//! Error types for treelattice.
//!
//! Every failure a lattice pricing call can report is one of three kinds:
//! bad caller input, lattice parameters that fall outside the open unit
//! interval, or a combination of features the engine does not implement.
//! The `ensure!`, `degenerate!` and `unsupported!` macros defined here
//! return the matching variant early.

use thiserror::Error;

/// The top-level error type used throughout treelattice.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A scalar or vector input is non-finite or out of its domain
    /// (spot ≤ 0, volatility ≤ 0, zero steps, vector length mismatch, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A derived probability landed outside `(0, 1)`.
    ///
    /// The chosen step count / volatility / rate combination is numerically
    /// unstable for the lattice formula in use.
    #[error("degenerate lattice parameters: {0}")]
    DegenerateParameters(String),

    /// The requested combination of features is not implemented.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
}

impl Error {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::DegenerateParameters(_) => "degenerate_parameters",
            Error::UnsupportedConfiguration(_) => "unsupported_configuration",
        }
    }
}

/// Shorthand `Result` type used throughout treelattice.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidInput(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use tl_core::{ensure, errors::Error};
/// fn positive(x: f64) -> tl_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidInput(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidInput(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::DegenerateParameters(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use tl_core::{degenerate, errors::Error};
/// fn probability(p: f64) -> tl_core::errors::Result<f64> {
///     degenerate!(p > 0.0 && p < 1.0, "probability {p} outside (0, 1)");
///     Ok(p)
/// }
/// assert!(probability(0.5).is_ok());
/// assert!(matches!(probability(1.0), Err(Error::DegenerateParameters(_))));
/// ```
#[macro_export]
macro_rules! degenerate {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::DegenerateParameters(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::UnsupportedConfiguration(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use tl_core::{unsupported, errors::Error};
/// fn no_barrier(has_barrier: bool) -> tl_core::errors::Result<()> {
///     unsupported!(!has_barrier, "barrier not supported here");
///     Ok(())
/// }
/// assert!(no_barrier(false).is_ok());
/// assert!(matches!(no_barrier(true), Err(Error::UnsupportedConfiguration(_))));
/// ```
#[macro_export]
macro_rules! unsupported {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::UnsupportedConfiguration(
                format!($($msg)*)
            ));
        }
    };
}

/// Checks that `value` is finite and strictly positive.
pub fn ensure_positive(value: f64, name: &str) -> Result<()> {
    ensure!(value.is_finite(), "{name} should be finite, got {value}");
    ensure!(value > 0.0, "{name} should be positive, got {value}");
    Ok(())
}

/// Checks that `value` is finite.
pub fn ensure_finite(value: f64, name: &str) -> Result<()> {
    ensure!(value.is_finite(), "{name} should be finite, got {value}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_nan_and_zero() {
        assert!(ensure_positive(1.0, "spot").is_ok());
        assert_eq!(
            ensure_positive(0.0, "spot"),
            Err(Error::InvalidInput("spot should be positive, got 0".into()))
        );
        assert!(ensure_positive(f64::NAN, "spot").is_err());
        assert!(ensure_positive(f64::INFINITY, "spot").is_err());
    }

    #[test]
    fn finite_check_accepts_negative_rates() {
        assert!(ensure_finite(-0.01, "interest rate").is_ok());
        assert!(ensure_finite(f64::NEG_INFINITY, "interest rate").is_err());
    }

    #[test]
    fn kinds_are_distinct() {
        assert_eq!(Error::InvalidInput(String::new()).kind(), "invalid_input");
        assert_eq!(
            Error::DegenerateParameters(String::new()).kind(),
            "degenerate_parameters"
        );
        assert_eq!(
            Error::UnsupportedConfiguration(String::new()).kind(),
            "unsupported_configuration"
        );
    }

    #[test]
    fn display_carries_message() {
        let e = Error::UnsupportedConfiguration("barrier with time-varying lattice".into());
        assert_eq!(
            e.to_string(),
            "unsupported configuration: barrier with time-varying lattice"
        );
    }
}
