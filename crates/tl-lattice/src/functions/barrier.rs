//! Knock-out barrier payoff.

use tl_core::{Real, Size};

use super::{OptionFunction1D, VanillaFunction};
use crate::lattice::{AssetLadder, StepParameters};
use crate::option::Barrier;

/// A vanilla payoff voided at every node on or through the barrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierFunction {
    vanilla: VanillaFunction,
    barrier: Barrier,
}

impl BarrierFunction {
    /// Layer `barrier` on `vanilla`.
    pub fn new(vanilla: VanillaFunction, barrier: Barrier) -> Self {
        Self { vanilla, barrier }
    }
}

impl OptionFunction1D for BarrierFunction {
    fn terminal_payoff(&self, ladder: &AssetLadder, steps: Size) -> Vec<Real> {
        ladder
            .prices(steps)
            .map(|s| {
                if self.barrier.is_crossed(s) {
                    0.0
                } else {
                    self.vanilla.payoff(s)
                }
            })
            .collect()
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
            .map(|(s, pair)| {
                if self.barrier.is_crossed(s) {
                    0.0
                } else {
                    self.vanilla.node_value(step, pair[0], pair[1], s)
                }
            })
            .collect()
    }
}
