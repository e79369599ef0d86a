//! Discrete dividend schedules.
//!
//! A [`DividendSchedule`] is either proportional (each payment removes a
//! fraction `β_k` of the price) or cash (each payment removes a fixed amount
//! `D_k`). Dividend times are mapped onto lattice steps with `⌊t/dt⌋`; the
//! backward induction then applies each entry exactly once, latest first,
//! when it reaches the matching step.
//!
//! Proportional schedules scale the base of the price ladder. Cash schedules
//! leave the base at `S − Σ D_k e^{−r t_k}` and carry the present value of
//! the dividends still to come as an additive offset on every node price.

use tl_core::{ensure, unsupported, DiscountFactor, Rate, Real, Result, Size, Time};
use tracing::trace;

// ─── DividendKind ─────────────────────────────────────────────────────────────

/// How a dividend payment reduces the underlying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DividendKind {
    /// The price drops by a fraction of itself.
    Proportional,
    /// The price drops by a fixed cash amount.
    Cash,
}

/// One scheduled dividend.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dividend {
    /// Payment time in years from the valuation date.
    pub time: Time,
    /// Rate `β` for proportional dividends, cash amount `D` otherwise.
    pub amount: Real,
}

// ─── DividendSchedule ─────────────────────────────────────────────────────────

/// An ordered schedule of dividends of a single kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DividendSchedule {
    kind: DividendKind,
    dividends: Vec<Dividend>,
}

impl DividendSchedule {
    /// A proportional schedule. Rates must lie in `[0, 1)`.
    pub fn proportional(times: &[Time], rates: &[Real]) -> Result<Self> {
        Self::new(DividendKind::Proportional, times, rates)
    }

    /// A cash schedule. Amounts must be non-negative.
    pub fn cash(times: &[Time], amounts: &[Real]) -> Result<Self> {
        Self::new(DividendKind::Cash, times, amounts)
    }

    fn new(kind: DividendKind, times: &[Time], amounts: &[Real]) -> Result<Self> {
        ensure!(
            times.len() == amounts.len(),
            "dividend times and amounts differ in length: {} vs {}",
            times.len(),
            amounts.len()
        );
        let mut previous = 0.0;
        for (&time, &amount) in times.iter().zip(amounts) {
            ensure!(time.is_finite(), "dividend time should be finite, got {time}");
            ensure!(
                time > previous,
                "dividend times should be positive and strictly increasing, got {time} after {previous}"
            );
            ensure!(amount.is_finite(), "dividend amount should be finite, got {amount}");
            match kind {
                DividendKind::Proportional => ensure!(
                    (0.0..1.0).contains(&amount),
                    "proportional dividend should be in [0, 1), got {amount}"
                ),
                DividendKind::Cash => {
                    ensure!(amount >= 0.0, "cash dividend should be non-negative, got {amount}")
                }
            }
            previous = time;
        }
        let dividends = times
            .iter()
            .zip(amounts)
            .map(|(&time, &amount)| Dividend { time, amount })
            .collect();
        Ok(Self { kind, dividends })
    }

    /// The dividend kind.
    pub fn kind(&self) -> DividendKind {
        self.kind
    }

    /// Scheduled dividends in time order.
    pub fn dividends(&self) -> &[Dividend] {
        &self.dividends
    }

    /// Number of dividends.
    pub fn len(&self) -> usize {
        self.dividends.len()
    }

    /// Whether the schedule holds no dividends.
    pub fn is_empty(&self) -> bool {
        self.dividends.is_empty()
    }

    /// Check that every dividend falls before expiry.
    pub fn validate(&self, time_to_expiry: Time) -> Result<()> {
        if let Some(last) = self.dividends.last() {
            ensure!(
                last.time < time_to_expiry,
                "dividend at {} falls on or after expiry {time_to_expiry}",
                last.time
            );
        }
        Ok(())
    }

    /// Lattice step of each dividend, `⌊t/dt⌋`.
    pub fn dividend_steps(&self, dt: Time) -> Vec<Size> {
        self.dividends
            .iter()
            .map(|d| (d.time / dt).floor() as Size)
            .collect()
    }

    /// Reject a step size too coarse to resolve the calendar.
    ///
    /// # Errors
    /// `UnsupportedConfiguration` if two dividends land on one step or a
    /// dividend lands at or beyond `steps`.
    pub fn check_time_steps(&self, dt: Time, steps: Size) -> Result<()> {
        let indices = self.dividend_steps(dt);
        for pair in indices.windows(2) {
            unsupported!(
                pair[0] != pair[1],
                "number of steps is too small: two dividends fall on step {}",
                pair[0]
            );
        }
        if let Some(&last) = indices.last() {
            unsupported!(
                last < steps,
                "dividend step {last} exceeds the {steps} available steps"
            );
        }
        Ok(())
    }

    /// Base of the price ladder at expiry.
    ///
    /// Proportional: `S·Π(1 − β_k)`. Cash: `S − Σ D_k e^{−r t_k}`.
    pub fn spot_modifier(&self, spot: Real, interest_rate: Rate) -> Real {
        match self.kind {
            DividendKind::Proportional => self
                .dividends
                .iter()
                .fold(spot, |acc, d| acc * (1.0 - d.amount)),
            DividendKind::Cash => {
                spot - self
                    .dividends
                    .iter()
                    .map(|d| d.amount * (-interest_rate * d.time).exp())
                    .sum::<Real>()
            }
        }
    }

    /// Apply dividend `index` to a running value during backward induction.
    ///
    /// Proportional: the running base is divided by `1 − β`. Cash: the
    /// dividend's value at `time_at_step` is added to the running offset.
    /// `index` must be below [`len`](Self::len).
    pub(crate) fn dividend_correction(
        &self,
        running: Real,
        interest_rate: Rate,
        time_at_step: Time,
        index: usize,
    ) -> Real {
        let d = self.dividends[index];
        match self.kind {
            DividendKind::Proportional => running / (1.0 - d.amount),
            DividendKind::Cash => {
                running + d.amount * (-interest_rate * (d.time - time_at_step)).exp()
            }
        }
    }
}

// ─── DividendAdjuster ─────────────────────────────────────────────────────────

/// Applies the corrections due at each backward step to a price ladder.
#[derive(Debug, Clone)]
pub(crate) struct DividendAdjuster {
    schedule: DividendSchedule,
    steps: Vec<Size>,
    interest_rate: Rate,
    dt: Time,
    step_discount: DiscountFactor,
    remaining: usize,
}

impl DividendAdjuster {
    pub(crate) fn new(
        schedule: &DividendSchedule,
        interest_rate: Rate,
        dt: Time,
        steps: Size,
    ) -> Result<Self> {
        schedule.check_time_steps(dt, steps)?;
        Ok(Self {
            schedule: schedule.clone(),
            steps: schedule.dividend_steps(dt),
            interest_rate,
            dt,
            step_discount: (-interest_rate * dt).exp(),
            remaining: schedule.len(),
        })
    }

    /// Move the ladder state from depth `step + 1` back to depth `step`.
    pub(crate) fn apply(&mut self, step: Size, base: &mut Real, offset: &mut Real) {
        if self.schedule.kind == DividendKind::Cash {
            *offset *= self.step_discount;
        }
        while self.remaining > 0 && self.steps[self.remaining - 1] == step {
            let k = self.remaining - 1;
            match self.schedule.kind {
                DividendKind::Proportional => {
                    *base = self.schedule.dividend_correction(*base, 0.0, 0.0, k);
                }
                DividendKind::Cash => {
                    let t = step as Real * self.dt;
                    *offset = self.schedule.dividend_correction(*offset, self.interest_rate, t, k);
                }
            }
            trace!(step, index = k, kind = ?self.schedule.kind, base = *base, offset = *offset, "dividend correction");
            self.remaining -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tl_core::Error;

    #[test]
    fn construction_checks_ordering_and_ranges() {
        assert!(DividendSchedule::proportional(&[0.2, 0.5], &[0.02, 0.03]).is_ok());
        assert!(DividendSchedule::proportional(&[0.5, 0.2], &[0.02, 0.03]).is_err());
        assert!(DividendSchedule::proportional(&[0.2, 0.2], &[0.02, 0.03]).is_err());
        assert!(DividendSchedule::proportional(&[0.0], &[0.02]).is_err());
        assert!(DividendSchedule::proportional(&[0.2], &[1.0]).is_err());
        assert!(DividendSchedule::cash(&[0.2], &[-1.0]).is_err());
        assert!(DividendSchedule::cash(&[0.2, 0.4], &[1.0]).is_err());
    }

    #[test]
    fn dividends_must_precede_expiry() {
        let s = DividendSchedule::cash(&[0.3, 1.0], &[1.0, 1.0]).unwrap();
        assert!(matches!(s.validate(1.0), Err(Error::InvalidInput(_))));
        assert!(s.validate(1.5).is_ok());
    }

    #[test]
    fn steps_are_floored() {
        let s = DividendSchedule::cash(&[0.26, 0.5, 0.99], &[1.0; 3]).unwrap();
        assert_eq!(s.dividend_steps(0.25), vec![1, 2, 3]);
        assert!(s.check_time_steps(0.25, 4).is_ok());
    }

    #[test]
    fn colliding_dividends_are_unsupported() {
        let s = DividendSchedule::cash(&[0.26, 0.4], &[1.0, 1.0]).unwrap();
        assert!(matches!(
            s.check_time_steps(0.25, 4),
            Err(Error::UnsupportedConfiguration(_))
        ));
        assert!(s.check_time_steps(0.1, 10).is_ok());
    }

    #[test]
    fn dividend_on_last_step_is_unsupported() {
        // ⌊0.95 / 0.1⌋ = 9 = steps
        let s = DividendSchedule::cash(&[0.3, 0.95], &[1.0, 1.0]).unwrap();
        assert!(matches!(
            s.check_time_steps(0.1, 9),
            Err(Error::UnsupportedConfiguration(_))
        ));
        assert!(s.check_time_steps(0.1, 10).is_ok());
    }

    #[test]
    fn correction_by_kind() {
        let p = DividendSchedule::proportional(&[0.5], &[0.2]).unwrap();
        assert_abs_diff_eq!(p.dividend_correction(80.0, 0.0, 0.0, 0), 100.0, epsilon = 1e-12);
        let c = DividendSchedule::cash(&[0.5], &[2.0]).unwrap();
        let expected = 1.0 + 2.0 * (-0.05_f64 * 0.2).exp();
        assert_abs_diff_eq!(c.dividend_correction(1.0, 0.05, 0.3, 0), expected, epsilon = 1e-12);
    }

    #[test]
    fn spot_modifier_by_kind() {
        let p = DividendSchedule::proportional(&[0.2, 0.6], &[0.1, 0.2]).unwrap();
        assert_abs_diff_eq!(p.spot_modifier(100.0, 0.05), 72.0, epsilon = 1e-12);
        let c = DividendSchedule::cash(&[0.5], &[2.0]).unwrap();
        let expected = 100.0 - 2.0 * (-0.025_f64).exp();
        assert_abs_diff_eq!(c.spot_modifier(100.0, 0.05), expected, epsilon = 1e-12);
    }

    #[test]
    fn adjuster_restores_spot_at_root() {
        let s = DividendSchedule::proportional(&[0.3, 0.7], &[0.05, 0.1]).unwrap();
        let mut base = s.spot_modifier(100.0, 0.0);
        let mut offset = 0.0;
        let mut adj = DividendAdjuster::new(&s, 0.03, 0.1, 10).unwrap();
        for i in (0..10).rev() {
            adj.apply(i, &mut base, &mut offset);
        }
        assert_abs_diff_eq!(base, 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(offset, 0.0);
    }

    #[test]
    fn cash_offset_is_present_value_at_root() {
        let s = DividendSchedule::cash(&[0.35, 0.75], &[1.5, 2.0]).unwrap();
        let r = 0.04;
        let mut base = s.spot_modifier(100.0, r);
        let mut offset = 0.0;
        let mut adj = DividendAdjuster::new(&s, r, 0.1, 10).unwrap();
        for i in (0..10).rev() {
            adj.apply(i, &mut base, &mut offset);
        }
        let pv = 1.5 * (-r * 0.35_f64).exp() + 2.0 * (-r * 0.75_f64).exp();
        assert_abs_diff_eq!(offset, pv, epsilon = 1e-12);
        assert_abs_diff_eq!(base + offset, 100.0, epsilon = 1e-12);
    }
}
