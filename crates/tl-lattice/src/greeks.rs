//! Greeks read off the early depths of the lattice.
//!
//! Delta and gamma are finite differences between the node values captured
//! at depths 1 and 2 while the induction runs; no second lattice is built.
//! Theta comes from the lattice family (see
//! [`ConstantLattice::theta`](crate::lattice::ConstantLattice::theta)).

use nalgebra::DMatrix;
use tl_core::{Real, Size};

use crate::lattice::AssetLadder;

// ─── Results ──────────────────────────────────────────────────────────────────

/// Price and sensitivities of a one-asset option.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// Fair value.
    pub price: Real,
    /// ∂V/∂S.
    pub delta: Real,
    /// ∂²V/∂S².
    pub gamma: Real,
    /// ∂V/∂t.
    pub theta: Real,
}

/// Price and sensitivities of a two-asset option.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoAssetGreeks {
    /// Fair value.
    pub price: Real,
    /// ∂V/∂S₁.
    pub delta1: Real,
    /// ∂V/∂S₂.
    pub delta2: Real,
    /// ∂V/∂t.
    pub theta: Real,
    /// ∂²V/∂S₁².
    pub gamma1: Real,
    /// ∂²V/∂S₂².
    pub gamma2: Real,
    /// ∂²V/∂S₁∂S₂.
    pub cross_gamma: Real,
}

/// Captured node data a lattice family needs to compute theta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GreekNodes {
    /// Value at the root.
    pub price: Real,
    /// Delta from depth 1.
    pub delta: Real,
    /// Gamma from depth 2.
    pub gamma: Real,
    /// Value of the middle node at depth 2.
    pub middle: Real,
}

// ─── Finite differences ───────────────────────────────────────────────────────

/// `(V₁ − V₀)/(S₁ − S₀)` over the two nodes at depth 1.
pub fn centered_delta(values: &[Real], prices: [Real; 2]) -> Real {
    (values[1] - values[0]) / (prices[1] - prices[0])
}

/// Three-point second derivative over the three nodes at depth 2.
pub fn three_point_gamma(values: &[Real], prices: [Real; 3]) -> Real {
    let high = (values[2] - values[1]) / (prices[2] - prices[1]);
    let low = (values[1] - values[0]) / (prices[1] - prices[0]);
    2.0 * (high - low) / (prices[2] - prices[0])
}

fn depth_prices<const N: usize>(ladder: &AssetLadder) -> [Real; N] {
    let mut out = [0.0; N];
    for (slot, p) in out.iter_mut().zip(ladder.prices(N - 1)) {
        *slot = p;
    }
    out
}

// ─── Capture during induction ─────────────────────────────────────────────────

/// Records what the one-asset Greeks need as the induction passes depths 2
/// and 1. Node prices are read from the ladder at that moment, so dividend
/// adjustments are already reflected.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GreekCapture {
    delta: Real,
    gamma: Real,
    middle: Real,
}

impl GreekCapture {
    pub(crate) fn observe(&mut self, depth: Size, values: &[Real], ladder: &AssetLadder) {
        match depth {
            2 => {
                self.gamma = three_point_gamma(values, depth_prices::<3>(ladder));
                self.middle = values[1];
            }
            1 => self.delta = centered_delta(values, depth_prices::<2>(ladder)),
            _ => {}
        }
    }

    pub(crate) fn finish(self, price: Real) -> GreekNodes {
        GreekNodes {
            price,
            delta: self.delta,
            gamma: self.gamma,
            middle: self.middle,
        }
    }
}

/// The two-asset counterpart of [`GreekCapture`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TwoAssetCapture {
    delta1: Real,
    delta2: Real,
    gamma1: Real,
    gamma2: Real,
    cross_gamma: Real,
    middle: Real,
}

impl TwoAssetCapture {
    pub(crate) fn observe(
        &mut self,
        depth: Size,
        values: &DMatrix<Real>,
        ladder1: &AssetLadder,
        ladder2: &AssetLadder,
    ) {
        match depth {
            2 => {
                let p1 = depth_prices::<3>(ladder1);
                let p2 = depth_prices::<3>(ladder2);
                // averaged over the three rows (columns) of the other asset
                let (mut high1, mut low1, mut high2, mut low2) = (0.0, 0.0, 0.0, 0.0);
                for k in 0..3 {
                    high1 += values[(2, k)] - values[(1, k)];
                    low1 += values[(1, k)] - values[(0, k)];
                    high2 += values[(k, 2)] - values[(k, 1)];
                    low2 += values[(k, 1)] - values[(k, 0)];
                }
                self.gamma1 = 2.0 * (high1 / (p1[2] - p1[1]) - low1 / (p1[1] - p1[0]))
                    / (p1[2] - p1[0])
                    / 3.0;
                self.gamma2 = 2.0 * (high2 / (p2[2] - p2[1]) - low2 / (p2[1] - p2[0]))
                    / (p2[2] - p2[0])
                    / 3.0;
                self.middle = values[(1, 1)];
            }
            1 => {
                let p1 = depth_prices::<2>(ladder1);
                let p2 = depth_prices::<2>(ladder2);
                let diff1 = p1[1] - p1[0];
                let diff2 = p2[1] - p2[0];
                let up2_move1 = values[(1, 1)] - values[(0, 1)];
                let down2_move1 = values[(1, 0)] - values[(0, 0)];
                let up1_move2 = values[(1, 1)] - values[(1, 0)];
                let down1_move2 = values[(0, 1)] - values[(0, 0)];
                self.delta1 = 0.5 * (up2_move1 + down2_move1) / diff1;
                self.delta2 = 0.5 * (up1_move2 + down1_move2) / diff2;
                self.cross_gamma = (up2_move1 - down2_move1) / diff1 / diff2;
            }
            _ => {}
        }
    }

    pub(crate) fn finish(self, price: Real, dt: Real) -> TwoAssetGreeks {
        TwoAssetGreeks {
            price,
            delta1: self.delta1,
            delta2: self.delta2,
            theta: 0.5 * (self.middle - price) / dt,
            gamma1: self.gamma1,
            gamma2: self.gamma2,
            cross_gamma: self.cross_gamma,
        }
    }
}
