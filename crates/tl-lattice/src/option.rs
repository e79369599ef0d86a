//! Option specifications priced on the lattice.
//!
//! An [`OptionSpec`] carries everything the payoff/recursion strategy needs
//! for a one-asset contract: strike, call/put flag, step count, exercise
//! style and an optional knock-out [`Barrier`]. [`TwoAssetOptionSpec`] is the
//! counterpart for the correlated two-asset tree.
//!
//! These are plain value objects passed per call; no engine instance ever
//! stores them.

use std::fmt;

use tl_core::{ensure, ensure_finite, ensure_positive, Real, Result, Size};

use crate::functions::{BarrierFunction, PayoffStrategy, VanillaFunction};

// ─── OptionType ───────────────────────────────────────────────────────────────

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

// ─── ExerciseStyle ────────────────────────────────────────────────────────────

/// When the holder may exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseStyle {
    /// Only at expiry.
    European,
    /// At any lattice node up to expiry.
    American,
}

// ─── Barrier ──────────────────────────────────────────────────────────────────

/// Knock-out direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarrierDirection {
    /// Voided once the underlying falls to or below the level.
    DownAndOut,
    /// Voided once the underlying rises to or above the level.
    UpAndOut,
}

impl fmt::Display for BarrierDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarrierDirection::DownAndOut => write!(f, "DownAndOut"),
            BarrierDirection::UpAndOut => write!(f, "UpAndOut"),
        }
    }
}

/// A knock-out barrier.
///
/// Knock-in barriers are not modelled; they follow from in-out parity
/// against the vanilla price.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Barrier {
    /// Barrier level.
    pub level: Real,
    /// Knock-out direction.
    pub direction: BarrierDirection,
}

impl Barrier {
    /// A down-and-out barrier at `level`.
    pub fn down_and_out(level: Real) -> Self {
        Self {
            level,
            direction: BarrierDirection::DownAndOut,
        }
    }

    /// An up-and-out barrier at `level`.
    pub fn up_and_out(level: Real) -> Self {
        Self {
            level,
            direction: BarrierDirection::UpAndOut,
        }
    }

    /// Whether an underlying price at `price` has touched or crossed the
    /// barrier.
    #[inline]
    pub fn is_crossed(&self, price: Real) -> bool {
        match self.direction {
            BarrierDirection::DownAndOut => price <= self.level,
            BarrierDirection::UpAndOut => price >= self.level,
        }
    }

    /// Whether the contract is already knocked out at inception.
    pub fn check_out(&self, spot: Real) -> bool {
        self.is_crossed(spot)
    }

    /// Whether the strike lies on the knocked-out side of the barrier, so the
    /// option can never pay: a down-and-out put struck at or below the level,
    /// or an up-and-out call struck at or above it.
    pub fn strike_behind_barrier(&self, strike: Real, option_type: OptionType) -> bool {
        match (self.direction, option_type) {
            (BarrierDirection::DownAndOut, OptionType::Put) => strike <= self.level,
            (BarrierDirection::UpAndOut, OptionType::Call) => strike >= self.level,
            _ => false,
        }
    }
}

// ─── OptionSpec ───────────────────────────────────────────────────────────────

/// A one-asset option priced on the binomial lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionSpec {
    /// Strike price.
    pub strike: Real,
    /// Call or put.
    pub option_type: OptionType,
    /// Number of lattice steps.
    pub steps: Size,
    /// Exercise style.
    pub exercise: ExerciseStyle,
    /// Optional knock-out barrier.
    pub barrier: Option<Barrier>,
}

impl OptionSpec {
    /// Create a new option specification without a barrier.
    pub fn new(option_type: OptionType, strike: Real, steps: Size, exercise: ExerciseStyle) -> Self {
        Self {
            strike,
            option_type,
            steps,
            exercise,
            barrier: None,
        }
    }

    /// Convenience: a European call/put.
    pub fn european(option_type: OptionType, strike: Real, steps: Size) -> Self {
        Self::new(option_type, strike, steps, ExerciseStyle::European)
    }

    /// Convenience: an American call/put.
    pub fn american(option_type: OptionType, strike: Real, steps: Size) -> Self {
        Self::new(option_type, strike, steps, ExerciseStyle::American)
    }

    /// Attach a knock-out barrier.
    pub fn with_barrier(mut self, barrier: Barrier) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Validate the contract terms.
    pub fn validate(&self) -> Result<()> {
        ensure_finite(self.strike, "strike")?;
        ensure!(self.strike >= 0.0, "strike should be non-negative, got {}", self.strike);
        ensure!(self.steps > 0, "number of steps should be positive");
        if let Some(barrier) = &self.barrier {
            ensure_positive(barrier.level, "barrier level")?;
        }
        Ok(())
    }

    /// Whether the barrier (if any) voids the contract before any induction
    /// happens.
    pub fn is_pre_empted(&self, spot: Real) -> bool {
        self.barrier.is_some_and(|b| {
            b.check_out(spot) || b.strike_behind_barrier(self.strike, self.option_type)
        })
    }

    /// The payoff/recursion strategy for this contract.
    pub fn strategy(&self) -> PayoffStrategy {
        let vanilla = VanillaFunction::new(self.option_type, self.strike, self.exercise);
        match self.barrier {
            None => PayoffStrategy::Vanilla(vanilla),
            Some(barrier) => PayoffStrategy::Barrier(BarrierFunction::new(vanilla, barrier)),
        }
    }
}

// ─── Two-asset contracts ──────────────────────────────────────────────────────

/// Terminal payoff shapes available on the two-asset tree.
///
/// `φ` below is the option type sign and `K` the spec strike.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TwoAssetPayoff {
    /// `max(φ(S₁ − S₂ − K), 0)`.
    Spread,
    /// `max(φ(S₁·S₂ − K), 0)`.
    Product,
    /// `max(φ(max(S₁, S₂) − K), 0)`.
    Maximum,
    /// `max(φ(min(S₁, S₂) − K), 0)`.
    Minimum,
    /// `max(Q₁·S₁ − Q₂·S₂, 0)`; strike and option type are ignored.
    Exchange {
        /// Quantity of the first asset received.
        quantity1: Real,
        /// Quantity of the second asset delivered.
        quantity2: Real,
    },
    /// `max(φ(S₂ − K₂), 0)` if `φ(S₁ − K) > 0`, otherwise 0.
    Correlation {
        /// Strike applied to the second asset.
        strike2: Real,
    },
}

/// A two-asset option priced on the correlated binomial lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoAssetOptionSpec {
    /// Payoff shape.
    pub payoff: TwoAssetPayoff,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
    /// Number of lattice steps.
    pub steps: Size,
    /// Exercise style.
    pub exercise: ExerciseStyle,
}

impl TwoAssetOptionSpec {
    /// Create a new two-asset option specification.
    pub fn new(
        payoff: TwoAssetPayoff,
        option_type: OptionType,
        strike: Real,
        steps: Size,
        exercise: ExerciseStyle,
    ) -> Self {
        Self {
            payoff,
            option_type,
            strike,
            steps,
            exercise,
        }
    }

    /// Convenience: a European spread option.
    pub fn spread(option_type: OptionType, strike: Real, steps: Size) -> Self {
        Self::new(TwoAssetPayoff::Spread, option_type, strike, steps, ExerciseStyle::European)
    }

    /// Convenience: a European product option.
    pub fn product(option_type: OptionType, strike: Real, steps: Size) -> Self {
        Self::new(TwoAssetPayoff::Product, option_type, strike, steps, ExerciseStyle::European)
    }

    /// Switch to American exercise.
    pub fn with_american_exercise(mut self) -> Self {
        self.exercise = ExerciseStyle::American;
        self
    }

    /// Validate the contract terms.
    pub fn validate(&self) -> Result<()> {
        ensure_finite(self.strike, "strike")?;
        ensure!(self.strike >= 0.0, "strike should be non-negative, got {}", self.strike);
        ensure!(self.steps > 0, "number of steps should be positive");
        match self.payoff {
            TwoAssetPayoff::Exchange {
                quantity1,
                quantity2,
            } => {
                ensure_positive(quantity1, "quantity1")?;
                ensure_positive(quantity2, "quantity2")?;
            }
            TwoAssetPayoff::Correlation { strike2 } => {
                ensure_finite(strike2, "strike2")?;
                ensure!(strike2 >= 0.0, "strike2 should be non-negative, got {strike2}");
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_and_out_crossing_is_inclusive() {
        let b = Barrier::down_and_out(80.0);
        assert!(b.is_crossed(80.0));
        assert!(b.is_crossed(79.9));
        assert!(!b.is_crossed(80.1));
    }

    #[test]
    fn up_and_out_crossing_is_inclusive() {
        let b = Barrier::up_and_out(120.0);
        assert!(b.is_crossed(120.0));
        assert!(!b.is_crossed(119.9));
    }

    #[test]
    fn strike_behind_barrier_only_for_dead_side() {
        let down = Barrier::down_and_out(90.0);
        assert!(down.strike_behind_barrier(85.0, OptionType::Put));
        assert!(!down.strike_behind_barrier(85.0, OptionType::Call));
        let up = Barrier::up_and_out(110.0);
        assert!(up.strike_behind_barrier(115.0, OptionType::Call));
        assert!(!up.strike_behind_barrier(115.0, OptionType::Put));
    }

    #[test]
    fn pre_emption_combines_both_checks() {
        let spec = OptionSpec::european(OptionType::Call, 100.0, 50)
            .with_barrier(Barrier::down_and_out(100.0));
        assert!(spec.is_pre_empted(95.0));
        assert!(!spec.is_pre_empted(105.0));
        let spec = OptionSpec::european(OptionType::Call, 130.0, 50)
            .with_barrier(Barrier::up_and_out(120.0));
        assert!(spec.is_pre_empted(100.0));
        assert!(!OptionSpec::european(OptionType::Put, 100.0, 10).is_pre_empted(1.0));
    }

    #[test]
    fn validation_rejects_bad_terms() {
        assert!(OptionSpec::european(OptionType::Call, 100.0, 0).validate().is_err());
        assert!(OptionSpec::european(OptionType::Call, -1.0, 10).validate().is_err());
        assert!(OptionSpec::european(OptionType::Call, f64::NAN, 10).validate().is_err());
        assert!(OptionSpec::european(OptionType::Call, 100.0, 10)
            .with_barrier(Barrier::up_and_out(0.0))
            .validate()
            .is_err());
        assert!(OptionSpec::american(OptionType::Put, 100.0, 10).validate().is_ok());
    }

    #[test]
    fn two_asset_validation() {
        let ok = TwoAssetOptionSpec::new(
            TwoAssetPayoff::Exchange {
                quantity1: 1.0,
                quantity2: 2.0,
            },
            OptionType::Call,
            0.0,
            20,
            ExerciseStyle::European,
        );
        assert!(ok.validate().is_ok());
        let bad = TwoAssetOptionSpec {
            payoff: TwoAssetPayoff::Exchange {
                quantity1: 0.0,
                quantity2: 2.0,
            },
            ..ok
        };
        assert!(bad.validate().is_err());
    }
}
