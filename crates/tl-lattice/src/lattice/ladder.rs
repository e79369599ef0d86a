//! Underlying prices on the lattice.

use tl_core::{ensure, Rate, Real, Result, Size, Time};

use crate::dividends::{DividendAdjuster, DividendSchedule};

/// Underlying price at any node, derived rather than stored.
///
/// The node at depth `i`, index `j` (counted from the lowest price) is
/// `base·d^i·(u/d)^j + offset`. Without dividends `base` is the spot and the
/// offset is zero. With a dividend schedule both evolve as the backward
/// induction passes dividend steps; see [`crate::dividends`].
#[derive(Debug, Clone)]
pub struct AssetLadder {
    base: Real,
    offset: Real,
    down: Real,
    up_over_down: Real,
    dividends: Option<DividendAdjuster>,
}

impl AssetLadder {
    /// A ladder without dividends.
    pub fn new(spot: Real, down: Real, up_over_down: Real) -> Self {
        Self {
            base: spot,
            offset: 0.0,
            down,
            up_over_down,
            dividends: None,
        }
    }

    /// A ladder positioned at expiry for a dividend schedule.
    ///
    /// # Errors
    /// `UnsupportedConfiguration` if the steps cannot resolve the schedule;
    /// `InvalidInput` if the dividends consume the whole spot.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn with_dividends(
        schedule: &DividendSchedule,
        spot: Real,
        interest_rate: Rate,
        dt: Time,
        steps: Size,
        down: Real,
        up_over_down: Real,
    ) -> Result<Self> {
        let adjuster = DividendAdjuster::new(schedule, interest_rate, dt, steps)?;
        let base = schedule.spot_modifier(spot, interest_rate);
        ensure!(
            base > 0.0,
            "dividends exceed the spot: dividend-adjusted spot is {base}"
        );
        Ok(Self {
            base,
            offset: 0.0,
            down,
            up_over_down,
            dividends: Some(adjuster),
        })
    }

    /// Current base of the multiplicative part.
    pub fn base(&self) -> Real {
        self.base
    }

    /// Current additive offset.
    pub fn offset(&self) -> Real {
        self.offset
    }

    /// Multiplicative part of the lowest node at `depth`.
    #[inline]
    pub fn lowest(&self, depth: Size) -> Real {
        self.base * self.down.powi(depth as i32)
    }

    /// Price at `(depth, index)`.
    #[inline]
    pub fn price(&self, depth: Size, index: Size) -> Real {
        self.lowest(depth) * self.up_over_down.powi(index as i32) + self.offset
    }

    /// All `depth + 1` prices at `depth`, lowest first.
    pub fn prices(&self, depth: Size) -> impl Iterator<Item = Real> + '_ {
        let ratio = self.up_over_down;
        std::iter::successors(Some(self.lowest(depth)), move |p| Some(p * ratio))
            .take(depth + 1)
            .map(move |p| p + self.offset)
    }

    /// Apply whatever dividend corrections fall due on `step`.
    #[inline]
    pub(crate) fn step_back(&mut self, step: Size) {
        if let Some(adjuster) = self.dividends.as_mut() {
            adjuster.apply(step, &mut self.base, &mut self.offset);
        }
    }
}
