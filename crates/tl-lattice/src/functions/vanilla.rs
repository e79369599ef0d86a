//! Vanilla European/American payoff.

use tl_core::{Real, Size};

use super::OptionFunction1D;
use crate::lattice::{AssetLadder, StepParameters};
use crate::option::{ExerciseStyle, OptionType};

/// A plain call or put, exercisable at expiry or at every node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanillaFunction {
    option_type: OptionType,
    strike: Real,
    exercise: ExerciseStyle,
}

impl VanillaFunction {
    /// Create a new vanilla function.
    pub fn new(option_type: OptionType, strike: Real, exercise: ExerciseStyle) -> Self {
        Self {
            option_type,
            strike,
            exercise,
        }
    }

    /// `max(φ(S − K), 0)`.
    #[inline]
    pub fn payoff(&self, price: Real) -> Real {
        (self.option_type.sign() * (price - self.strike)).max(0.0)
    }

    /// Value at one node given its two children.
    ///
    /// American exercise compares the continuation with `φ(S − K)`.
    #[inline]
    pub(crate) fn node_value(&self, step: &StepParameters, down: Real, up: Real, price: Real) -> Real {
        let continuation = step.continuation(down, up);
        match self.exercise {
            ExerciseStyle::European => continuation,
            ExerciseStyle::American => {
                continuation.max(self.option_type.sign() * (price - self.strike))
            }
        }
    }
}

impl OptionFunction1D for VanillaFunction {
    fn terminal_payoff(&self, ladder: &AssetLadder, steps: Size) -> Vec<Real> {
        ladder.prices(steps).map(|s| self.payoff(s)).collect()
    }

    fn next_step_values(
        &self,
        step: &StepParameters,
        values: &[Real],
        ladder: &AssetLadder,
        depth: Size,
    ) -> Vec<Real> {
        ladder
            .prices(depth)
            .zip(values.windows(2))
            .map(|(s, pair)| self.node_value(step, pair[0], pair[1], s))
            .collect()
    }
}
