//! Payoff and one-step recursion strategies.
//!
//! # Overview
//!
//! * [`OptionFunction1D`] — terminal payoff and backward step for one asset
//! * [`VanillaFunction`] — European/American call or put
//! * [`BarrierFunction`] — vanilla rule with knocked nodes forced to zero
//! * [`PayoffStrategy`] — the tagged variant the engine dispatches on
//! * [`OptionFunction2D`] — the same contract on the correlated two-asset tree,
//!   implemented by [`TwoAssetOptionSpec`](crate::option::TwoAssetOptionSpec)
//!
//! Every call returns a fresh, shorter vector (or matrix); the input values
//! of the previous depth are never mutated.

pub mod barrier;
pub mod two_asset;
pub mod vanilla;

pub use barrier::BarrierFunction;
pub use vanilla::VanillaFunction;

use nalgebra::DMatrix;
use tl_core::{Real, Size};

use crate::lattice::{AssetLadder, CorrelatedParameters, StepParameters};

/// Terminal payoff and backward recursion on a one-asset lattice.
pub trait OptionFunction1D {
    /// Values at expiry, one per node at depth `steps`, lowest price first.
    fn terminal_payoff(&self, ladder: &AssetLadder, steps: Size) -> Vec<Real>;

    /// Values at `depth` from the `depth + 2` values one step later.
    fn next_step_values(
        &self,
        step: &StepParameters,
        values: &[Real],
        ladder: &AssetLadder,
        depth: Size,
    ) -> Vec<Real>;
}

/// Terminal payoff and backward recursion on the two-asset lattice.
///
/// Matrix rows index asset 1 and columns asset 2, lowest price first.
pub trait OptionFunction2D {
    /// Values at expiry, a `(steps + 1)²` matrix.
    fn terminal_payoff(&self, ladder1: &AssetLadder, ladder2: &AssetLadder, steps: Size)
        -> DMatrix<Real>;

    /// Values at `depth` from the `(depth + 2)²` values one step later.
    fn next_step_values(
        &self,
        params: &CorrelatedParameters,
        values: &DMatrix<Real>,
        ladder1: &AssetLadder,
        ladder2: &AssetLadder,
        depth: Size,
    ) -> DMatrix<Real>;
}

/// The one-asset strategy selected for a contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayoffStrategy {
    /// European or American vanilla.
    Vanilla(VanillaFunction),
    /// Knock-out barrier layered on a vanilla.
    Barrier(BarrierFunction),
}

impl OptionFunction1D for PayoffStrategy {
    fn terminal_payoff(&self, ladder: &AssetLadder, steps: Size) -> Vec<Real> {
        match self {
            PayoffStrategy::Vanilla(f) => f.terminal_payoff(ladder, steps),
            PayoffStrategy::Barrier(f) => f.terminal_payoff(ladder, steps),
        }
    }

    fn next_step_values(
        &self,
        step: &StepParameters,
        values: &[Real],
        ladder: &AssetLadder,
        depth: Size,
    ) -> Vec<Real> {
        match self {
            PayoffStrategy::Vanilla(f) => f.next_step_values(step, values, ladder, depth),
            PayoffStrategy::Barrier(f) => f.next_step_values(step, values, ladder, depth),
        }
    }
}
