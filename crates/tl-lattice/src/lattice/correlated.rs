//! Correlated two-asset binomial lattice.
//!
//! Each asset moves on its own additive grid `±dx_k`; the four joint branch
//! probabilities carry the drift of both assets and their correlation.

use tl_core::{ensure, DiscountFactor, Probability, Real, Result, Size, Time};

use super::check_probability;
use crate::market::TwoAssetMarket;

/// Parameters of the correlated two-asset lattice.
///
/// Naming of the joint probabilities is `<asset 1 move><asset 2 move>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelatedParameters {
    /// Number of time steps.
    pub steps: Size,
    /// Time step `T / steps`.
    pub dt: Time,
    /// One-step discount factor.
    pub discount: DiscountFactor,
    /// Log space step of asset 1.
    pub dx1: Real,
    /// Log space step of asset 2.
    pub dx2: Real,
    /// Both assets up.
    pub uu: Probability,
    /// Asset 1 up, asset 2 down.
    pub ud: Probability,
    /// Asset 1 down, asset 2 up.
    pub du: Probability,
    /// Both assets down.
    pub dd: Probability,
}

impl CorrelatedParameters {
    /// Down factors `(e^{−dx₁}, e^{−dx₂})`.
    pub fn down(&self) -> (Real, Real) {
        ((-self.dx1).exp(), (-self.dx2).exp())
    }

    /// Ratios `(e^{2dx₁}, e^{2dx₂})` between neighbouring nodes.
    pub fn up_over_down(&self) -> (Real, Real) {
        ((2.0 * self.dx1).exp(), (2.0 * self.dx2).exp())
    }

    /// Discounted expectation over the four children of a node.
    ///
    /// Arguments follow the probability naming: `v_ud` is the child reached
    /// with asset 1 up and asset 2 down.
    #[inline]
    pub fn continuation(&self, v_uu: Real, v_ud: Real, v_du: Real, v_dd: Real) -> Real {
        self.discount * (self.uu * v_uu + self.ud * v_ud + self.du * v_du + self.dd * v_dd)
    }
}

/// Parameter provider for the correlated two-asset lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorrelatedLattice;

impl CorrelatedLattice {
    /// Derive the joint probabilities for `steps` steps.
    ///
    /// # Errors
    /// `InvalidInput` on bad market scalars or zero steps;
    /// `DegenerateParameters` if any joint probability leaves `(0, 1)`.
    pub fn parameters(&self, market: &TwoAssetMarket, steps: Size) -> Result<CorrelatedParameters> {
        ensure!(steps > 0, "number of steps should be positive");
        market.validate()?;
        let dt = market.time_to_expiry / steps as Real;
        let root_dt = dt.sqrt();
        let (s1, s2) = (market.volatility1, market.volatility2);
        let dx1 = s1 * root_dt;
        let dx2 = s2 * root_dt;
        let dx12 = dx1 * dx2;

        let nu1 = (market.interest_rate - market.dividend_yield1 - 0.5 * s1 * s1) * dx2 * dt;
        let nu2 = (market.interest_rate - market.dividend_yield2 - 0.5 * s2 * s2) * dx1 * dt;
        let cov = s1 * s2 * market.correlation * dt;

        let uu = 0.25 * (dx12 + nu1 + nu2 + cov) / dx12;
        let ud = 0.25 * (dx12 + nu1 - nu2 - cov) / dx12;
        let du = 0.25 * (dx12 - nu1 + nu2 - cov) / dx12;
        let dd = 0.25 * (dx12 - nu1 - nu2 + cov) / dx12;
        check_probability(uu, "uu probability")?;
        check_probability(ud, "ud probability")?;
        check_probability(du, "du probability")?;
        check_probability(dd, "dd probability")?;

        Ok(CorrelatedParameters {
            steps,
            dt,
            discount: (-market.interest_rate * dt).exp(),
            dx1,
            dx2,
            uu,
            ud,
            du,
            dd,
        })
    }
}
