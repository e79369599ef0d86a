//! Time-varying additive binomial lattice.
//!
//! Per-step volatility, rate and dividend vectors share one space step `Δx`,
//! so the tree recombines; each step gets its own length `dt_i`, up
//! probability and discount factor instead.

use tl_core::{ensure, Rate, Real, Result, Size, Time, Volatility};

use super::{check_probability, StepParameters, TimeGrid, TimeVaryingParameters};
use crate::greeks::GreekNodes;
use crate::market::TermMarket;

/// Parameter provider for the time-varying lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeVaryingLattice;

impl TimeVaryingLattice {
    /// Per-step drift of the log price, `ν_i = r_i − q_i − σ_i²/2`.
    pub fn shifted_drift(
        &self,
        volatilities: &[Volatility],
        interest_rates: &[Rate],
        dividend_yields: &[Rate],
    ) -> Vec<Real> {
        volatilities
            .iter()
            .zip(interest_rates)
            .zip(dividend_yields)
            .map(|((v, r), q)| r - q - 0.5 * v * v)
            .collect()
    }

    /// Common space step `Δx = √(⟨σ²⟩Δt̄ + ⟨ν²⟩Δt̄²)` with `Δt̄ = T/N`.
    pub fn space_step(
        &self,
        time_to_expiry: Time,
        volatilities: &[Volatility],
        steps: Size,
        drifts: &[Real],
    ) -> Real {
        let n = steps as Real;
        let dt = time_to_expiry / n;
        let mean_var = volatilities.iter().map(|v| v * v).sum::<Real>() / n;
        let mean_nu2 = drifts.iter().map(|nu| nu * nu).sum::<Real>() / n;
        (mean_var * dt + mean_nu2 * dt * dt).sqrt()
    }

    /// Step length and up probability for one step.
    ///
    /// `dt` is the positive root of `σ²dt + ν²dt² = Δx²`, written in a form
    /// that stays finite as `ν → 0`.
    pub fn step_parameters(
        &self,
        volatility: Volatility,
        drift: Real,
        space_step: Real,
    ) -> Result<(Time, Real)> {
        let var = volatility * volatility;
        let dx2 = space_step * space_step;
        let dt = 2.0 * dx2 / (var + (var * var + 4.0 * drift * drift * dx2).sqrt());
        let pu = 0.5 + 0.5 * drift * dt / space_step;
        check_probability(pu, "up probability")?;
        Ok((dt, pu))
    }

    /// Build the full per-step parameter set for a term market.
    ///
    /// # Errors
    /// `InvalidInput` on vector length mismatches or bad scalars;
    /// `DegenerateParameters` if any step's probability leaves `(0, 1)`.
    pub fn parameters(&self, market: &TermMarket, steps: Size) -> Result<TimeVaryingParameters> {
        ensure!(steps > 0, "number of steps should be positive");
        market.validate(steps)?;
        let drifts = self.shifted_drift(
            &market.volatilities,
            &market.interest_rates,
            &market.dividend_yields,
        );
        let space_step = self.space_step(market.time_to_expiry, &market.volatilities, steps, &drifts);

        let mut per_step = Vec::with_capacity(steps);
        for i in 0..steps {
            let (dt, pu) = self.step_parameters(market.volatilities[i], drifts[i], space_step)?;
            per_step.push(StepParameters {
                dt,
                up_probability: pu,
                down_probability: 1.0 - pu,
                discount: (-market.interest_rates[i] * dt).exp(),
            });
        }
        let dts: Vec<Time> = per_step.iter().map(|s| s.dt).collect();
        Ok(TimeVaryingParameters {
            space_step,
            per_step,
            grid: TimeGrid::from_dts(&dts),
        })
    }

    /// Theta from the middle node at depth 2, `(V(2,1) − V₀)/(dt₀ + dt₁)`.
    pub fn theta(&self, dt0: Time, dt1: Time, nodes: &GreekNodes) -> Real {
        (nodes.middle - nodes.price) / (dt0 + dt1)
    }
}
