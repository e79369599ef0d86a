//! Lattice parameter providers.
//!
//! # Overview
//!
//! * [`ConstantLattice`] — one set of up/down factors and probabilities reused
//!   at every step (CRR, Jarrow-Rudd, Trigeorgis, Tian, Leisen-Reimer)
//! * [`TimeVaryingLattice`] — a common space step with per-step time steps,
//!   probabilities and discount factors from per-step market vectors
//! * [`CorrelatedLattice`] — the four joint probabilities of the two-asset tree
//! * [`AssetLadder`] — underlying prices at any depth, dividend-adjusted
//! * [`TimeGrid`] — cumulative time at each depth
//!
//! [`Lattice`] is the two-variant sum type the engine selects once per call.

pub mod constant;
pub mod correlated;
pub mod ladder;
pub mod time_varying;

pub use constant::ConstantLattice;
pub use correlated::{CorrelatedLattice, CorrelatedParameters};
pub use ladder::AssetLadder;
pub use time_varying::TimeVaryingLattice;

use tl_core::{degenerate, DiscountFactor, Probability, Real, Size, Time};

// ─── TimeGrid ─────────────────────────────────────────────────────────────────

/// Cumulative time at each lattice depth.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<Time>,
}

impl TimeGrid {
    /// Create a grid from consecutive step lengths.
    pub fn from_dts(dts: &[Time]) -> Self {
        let mut times = Vec::with_capacity(dts.len() + 1);
        let mut t = 0.0;
        times.push(t);
        for dt in dts {
            t += dt;
            times.push(t);
        }
        Self { times }
    }

    /// Number of steps (= time points − 1).
    pub fn steps(&self) -> Size {
        self.times.len() - 1
    }

    /// Final time.
    pub fn end(&self) -> Time {
        self.times[self.times.len() - 1]
    }
}

// ─── Per-step parameters ──────────────────────────────────────────────────────

/// Discounting and branch probabilities for one backward step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParameters {
    /// Length of the step in years.
    pub dt: Time,
    /// Risk-neutral probability of the up branch.
    pub up_probability: Probability,
    /// Risk-neutral probability of the down branch.
    pub down_probability: Probability,
    /// One-step discount factor.
    pub discount: DiscountFactor,
}

impl StepParameters {
    /// Discounted expectation of the two children.
    #[inline]
    pub fn continuation(&self, down_value: Real, up_value: Real) -> Real {
        self.discount * (self.up_probability * up_value + self.down_probability * down_value)
    }
}

/// Parameters of a constant-parameter binomial lattice.
///
/// Invariant: `up_probability + down_probability == 1`, both strictly inside
/// `(0, 1)`, and `up > down > 0`. [`LatticeParameters::new`] rejects anything
/// else as degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParameters {
    /// Number of time steps.
    pub steps: Size,
    /// Time step `T / steps`.
    pub dt: Time,
    /// Multiplicative up factor.
    pub up: Real,
    /// Multiplicative down factor.
    pub down: Real,
    /// Risk-neutral up probability.
    pub up_probability: Probability,
    /// Risk-neutral down probability.
    pub down_probability: Probability,
    /// One-step discount factor (1 until [`LatticeParameters::with_discount`]).
    pub discount: DiscountFactor,
}

impl LatticeParameters {
    /// Build and validate a parameter set. The discount factor starts at 1.
    pub fn new(
        steps: Size,
        dt: Time,
        up: Real,
        down: Real,
        up_probability: Probability,
    ) -> tl_core::Result<Self> {
        check_factors(up, down)?;
        check_probability(up_probability, "up probability")?;
        Ok(Self {
            steps,
            dt,
            up,
            down,
            up_probability,
            down_probability: 1.0 - up_probability,
            discount: 1.0,
        })
    }

    /// Set the one-step discount factor `exp(−r·dt)`.
    pub fn with_discount(mut self, interest_rate: Real) -> Self {
        self.discount = (-interest_rate * self.dt).exp();
        self
    }

    /// Ratio `up / down` between neighbouring nodes at the same depth.
    pub fn up_over_down(&self) -> Real {
        self.up / self.down
    }

    /// The per-step view used by the backward recursion.
    pub fn step(&self) -> StepParameters {
        StepParameters {
            dt: self.dt,
            up_probability: self.up_probability,
            down_probability: self.down_probability,
            discount: self.discount,
        }
    }
}

/// Parameters of a time-varying lattice: common factors, per-step dynamics.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeVaryingParameters {
    /// Common space step `Δx`.
    pub space_step: Real,
    /// Per-step probabilities and discount factors.
    pub per_step: Vec<StepParameters>,
    /// Cumulative times implied by the per-step `dt`s.
    pub grid: TimeGrid,
}

impl TimeVaryingParameters {
    /// Up factor `e^{Δx}`.
    pub fn up(&self) -> Real {
        self.space_step.exp()
    }

    /// Down factor `e^{−Δx}`.
    pub fn down(&self) -> Real {
        (-self.space_step).exp()
    }
}

// ─── Lattice ──────────────────────────────────────────────────────────────────

/// The lattice family selected for one pricing call.
///
/// Constant and time-varying parameters are never mixed inside one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Lattice {
    /// One parameter set reused at every step.
    Constant(LatticeParameters),
    /// A fresh parameter set per step.
    TimeVarying(TimeVaryingParameters),
}

impl Lattice {
    /// Number of time steps.
    pub fn steps(&self) -> Size {
        match self {
            Lattice::Constant(p) => p.steps,
            Lattice::TimeVarying(p) => p.per_step.len(),
        }
    }

    /// Up factor.
    pub fn up(&self) -> Real {
        match self {
            Lattice::Constant(p) => p.up,
            Lattice::TimeVarying(p) => p.up(),
        }
    }

    /// Down factor.
    pub fn down(&self) -> Real {
        match self {
            Lattice::Constant(p) => p.down,
            Lattice::TimeVarying(p) => p.down(),
        }
    }

    /// Ratio `up / down`.
    pub fn up_over_down(&self) -> Real {
        self.up() / self.down()
    }

    /// Parameters of the step from depth `i` to depth `i + 1`.
    #[inline]
    pub fn step(&self, i: Size) -> StepParameters {
        match self {
            Lattice::Constant(p) => p.step(),
            Lattice::TimeVarying(p) => p.per_step[i],
        }
    }
}

// ─── Checks ───────────────────────────────────────────────────────────────────

pub(crate) fn check_probability(p: Probability, name: &str) -> tl_core::Result<()> {
    degenerate!(p.is_finite(), "{name} is not finite");
    degenerate!(p > 0.0, "{name} should be greater than 0, got {p}");
    degenerate!(p < 1.0, "{name} should be smaller than 1, got {p}");
    Ok(())
}

pub(crate) fn check_factors(up: Real, down: Real) -> tl_core::Result<()> {
    degenerate!(
        up.is_finite() && down.is_finite(),
        "up/down factors not finite: up = {up}, down = {down}"
    );
    degenerate!(
        down > 0.0 && up > down,
        "up/down factors must satisfy up > down > 0: up = {up}, down = {down}"
    );
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
