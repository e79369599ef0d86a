//! Constant-parameter binomial lattices.
//!
//! One set of factors and probabilities is derived per call and reused at
//! every step:
//!
//! | Variant | Type | Reference |
//! |---|---|---|
//! | [`ConstantLattice::CoxRossRubinstein`] | Equal jumps, `u·d = 1` | Cox, Ross & Rubinstein (1979) |
//! | [`ConstantLattice::JarrowRudd`] | Equal probabilities | Jarrow & Rudd (1983) |
//! | [`ConstantLattice::Trigeorgis`] | Additive equal jumps | Trigeorgis (1991) |
//! | [`ConstantLattice::Tian`] | Third-moment matching | Tian (1993) |
//! | [`ConstantLattice::LeisenReimer`] | Strike-centred, odd steps | Leisen & Reimer (1996) |

use tl_core::{ensure, Rate, Real, Result, Size, Time, Volatility};

use super::LatticeParameters;
use crate::greeks::GreekNodes;

/// A constant-parameter lattice family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstantLattice {
    /// `u = e^{σ√dt}`, `d = 1/u`, `p = (e^{b·dt} − d)/(u − d)`.
    #[default]
    CoxRossRubinstein,
    /// `u, d = e^{(b − σ²/2)dt ± σ√dt}`, `p = ½`.
    JarrowRudd,
    /// `dx = √(σ²dt + ν²dt²)`, `p = ½ + ½ν·dt/dx`.
    Trigeorgis,
    /// Matches the first three moments of the log-normal step.
    Tian,
    /// Peizer-Pratt inversion centred on the strike. Requires odd steps.
    LeisenReimer,
}

impl ConstantLattice {
    /// Derive the lattice parameters.
    ///
    /// `cost_of_carry` is `b = r − q`. The returned parameters carry a unit
    /// discount factor; the engine sets it from the interest rate.
    ///
    /// # Errors
    /// `InvalidInput` for an even step count or a zero strike with
    /// Leisen-Reimer; `DegenerateParameters` if a probability leaves `(0, 1)`.
    #[allow(clippy::too_many_arguments)]
    pub fn parameters(
        &self,
        spot: Real,
        strike: Real,
        time_to_expiry: Time,
        volatility: Volatility,
        cost_of_carry: Rate,
        steps: Size,
        dt: Time,
    ) -> Result<LatticeParameters> {
        let var = volatility * volatility * dt;
        let nu = cost_of_carry - 0.5 * volatility * volatility;
        match self {
            ConstantLattice::CoxRossRubinstein => {
                let dx = volatility * dt.sqrt();
                let up = dx.exp();
                let down = 1.0 / up;
                let pu = ((cost_of_carry * dt).exp() - down) / (up - down);
                LatticeParameters::new(steps, dt, up, down, pu)
            }
            ConstantLattice::JarrowRudd => {
                let drift = nu * dt;
                let std = volatility * dt.sqrt();
                LatticeParameters::new(steps, dt, (drift + std).exp(), (drift - std).exp(), 0.5)
            }
            ConstantLattice::Trigeorgis => {
                let dx = (var + nu * nu * dt * dt).sqrt();
                let pu = 0.5 + 0.5 * nu * dt / dx;
                LatticeParameters::new(steps, dt, dx.exp(), (-dx).exp(), pu)
            }
            ConstantLattice::Tian => {
                let q = var.exp();
                let r_m = (cost_of_carry * dt).exp();
                let root = (q * q + 2.0 * q - 3.0).sqrt();
                let up = 0.5 * r_m * q * (q + 1.0 + root);
                let down = 0.5 * r_m * q * (q + 1.0 - root);
                let pu = (r_m - down) / (up - down);
                LatticeParameters::new(steps, dt, up, down, pu)
            }
            ConstantLattice::LeisenReimer => {
                ensure!(
                    steps % 2 == 1,
                    "Leisen-Reimer lattice needs an odd number of steps, got {steps}"
                );
                ensure!(strike > 0.0, "Leisen-Reimer lattice needs a positive strike");
                let total_std = volatility * time_to_expiry.sqrt();
                let growth = (cost_of_carry * dt).exp();
                let d2 = ((spot / strike).ln() + nu * time_to_expiry) / total_std;
                let pu = peizer_pratt_2(d2, steps);
                let pdash = peizer_pratt_2(d2 + total_std, steps);
                let up = growth * pdash / pu;
                let down = (growth - pu * up) / (1.0 - pu);
                LatticeParameters::new(steps, dt, up, down, pu)
            }
        }
    }

    /// Theta from the lattice's own one-step relation.
    ///
    /// Families whose depth-2 middle node sits back at the spot use the
    /// forward difference `(V(2,1) − V₀)/(2dt)`. Drifting families use the
    /// Black-Scholes relation `θ = rV − bSΔ − ½σ²S²Γ`.
    pub fn theta(
        &self,
        spot: Real,
        volatility: Volatility,
        interest_rate: Rate,
        dividend_yield: Rate,
        dt: Time,
        nodes: &GreekNodes,
    ) -> Real {
        match self {
            ConstantLattice::CoxRossRubinstein | ConstantLattice::Trigeorgis => {
                (nodes.middle - nodes.price) / (2.0 * dt)
            }
            ConstantLattice::JarrowRudd | ConstantLattice::Tian | ConstantLattice::LeisenReimer => {
                interest_rate * nodes.price
                    - (interest_rate - dividend_yield) * spot * nodes.delta
                    - 0.5 * volatility * volatility * spot * spot * nodes.gamma
            }
        }
    }
}

/// Peizer-Pratt Method 2 inversion.
///
/// Maps a normal quantile `z` to a probability for an `n`-step binomial
/// approximation. `n` must be odd.
fn peizer_pratt_2(z: Real, n: Size) -> Real {
    let nf = n as Real;
    let r = z / (nf + 1.0 / 3.0 + 0.1 / (nf + 1.0));
    let ex = (-r * r * (nf + 1.0 / 6.0)).exp();
    0.5 + z.signum() * 0.5 * (1.0 - ex).sqrt()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
