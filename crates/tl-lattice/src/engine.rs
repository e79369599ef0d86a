//! Binomial tree pricing engine.
//!
//! Every call runs the same state machine: validate inputs, check for
//! barrier pre-emption, derive the lattice, seed the terminal values, then
//! step back to the root. Greeks are captured at depths 2 and 1 on the way.
//!
//! The engine holds no configuration; option, market and lattice choice are
//! all per-call arguments, so one value is safely shared across threads.

use nalgebra::DMatrix;
use tl_core::{ensure, unsupported, Real, Result, Size};
use tracing::debug;

use crate::dividends::DividendSchedule;
use crate::functions::{OptionFunction1D, OptionFunction2D};
use crate::greeks::{GreekCapture, GreekNodes, Greeks, TwoAssetCapture, TwoAssetGreeks};
use crate::lattice::{
    AssetLadder, ConstantLattice, CorrelatedLattice, CorrelatedParameters, Lattice,
    TimeVaryingLattice,
};
use crate::market::{FlatMarket, TermMarket, TwoAssetMarket};
use crate::option::{OptionSpec, TwoAssetOptionSpec};

/// Depth-2 nodes must exist for gamma and theta.
const MIN_STEPS_FOR_GREEKS: Size = 3;

/// Stateless binomial tree engine.
///
/// # Example
/// ```
/// use tl_lattice::{BinomialTreeEngine, ConstantLattice, FlatMarket, OptionSpec, OptionType};
///
/// let engine = BinomialTreeEngine::new();
/// let spec = OptionSpec::european(OptionType::Call, 100.0, 200);
/// let market = FlatMarket::new(100.0, 1.0, 0.2, 0.05, 0.0);
/// let price = engine.price(ConstantLattice::Tian, &spec, &market).unwrap();
/// assert!((price - 10.45).abs() < 1e-2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinomialTreeEngine;

impl BinomialTreeEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    // ─── Constant parameters ──────────────────────────────────────────────────

    /// Price with a constant-parameter lattice.
    ///
    /// # Errors
    /// `InvalidInput` for bad contract or market scalars;
    /// `DegenerateParameters` if the lattice probabilities leave `(0, 1)`.
    pub fn price(
        &self,
        lattice: ConstantLattice,
        spec: &OptionSpec,
        market: &FlatMarket,
    ) -> Result<Real> {
        spec.validate()?;
        market.validate()?;
        if pre_empted(spec, market.spot) {
            return Ok(0.0);
        }
        let params = constant_lattice(lattice, spec, market, market.cost_of_carry())?;
        let mut ladder = AssetLadder::new(market.spot, params.down(), params.up_over_down());
        Ok(induct(&spec.strategy(), &params, &mut ladder, None))
    }

    /// Price and Greeks with a constant-parameter lattice.
    ///
    /// # Errors
    /// As [`price`](Self::price); also `InvalidInput` for fewer than three
    /// steps.
    pub fn greeks(
        &self,
        lattice: ConstantLattice,
        spec: &OptionSpec,
        market: &FlatMarket,
    ) -> Result<Greeks> {
        spec.validate()?;
        market.validate()?;
        ensure_greek_steps(spec.steps)?;
        if pre_empted(spec, market.spot) {
            return Ok(Greeks::default());
        }
        let params = constant_lattice(lattice, spec, market, market.cost_of_carry())?;
        let mut ladder = AssetLadder::new(market.spot, params.down(), params.up_over_down());
        let mut capture = GreekCapture::default();
        let price = induct(&spec.strategy(), &params, &mut ladder, Some(&mut capture));
        let nodes = capture.finish(price);
        let dt = market.time_to_expiry / spec.steps as Real;
        let theta = lattice.theta(
            market.spot,
            market.volatility,
            market.interest_rate,
            market.dividend_yield,
            dt,
            &nodes,
        );
        Ok(greeks_from(nodes, theta))
    }

    // ─── Time-varying parameters ──────────────────────────────────────────────

    /// Price with per-step volatility, rate and dividend yield vectors.
    ///
    /// # Errors
    /// `UnsupportedConfiguration` if the contract carries a barrier;
    /// `InvalidInput` on vector length mismatches; `DegenerateParameters`
    /// if any step's probability leaves `(0, 1)`.
    pub fn price_time_varying(&self, spec: &OptionSpec, market: &TermMarket) -> Result<Real> {
        let params = time_varying_lattice(spec, market)?;
        let mut ladder = AssetLadder::new(market.spot, params.down(), params.up_over_down());
        Ok(induct(&spec.strategy(), &params, &mut ladder, None))
    }

    /// Price and Greeks with per-step market vectors.
    ///
    /// Theta is `(V(2,1) − V₀)/(dt₀ + dt₁)` using the first two step lengths.
    pub fn greeks_time_varying(&self, spec: &OptionSpec, market: &TermMarket) -> Result<Greeks> {
        ensure_greek_steps(spec.steps)?;
        let params = time_varying_lattice(spec, market)?;
        let mut ladder = AssetLadder::new(market.spot, params.down(), params.up_over_down());
        let mut capture = GreekCapture::default();
        let price = induct(&spec.strategy(), &params, &mut ladder, Some(&mut capture));
        let nodes = capture.finish(price);
        let theta = TimeVaryingLattice.theta(params.step(0).dt, params.step(1).dt, &nodes);
        Ok(greeks_from(nodes, theta))
    }

    // ─── Discrete dividends ───────────────────────────────────────────────────

    /// Price with a discrete dividend schedule.
    ///
    /// The schedule replaces the continuous yield, so the lattice is built
    /// with cost of carry `b = r` and `market.dividend_yield` must be zero.
    ///
    /// # Errors
    /// `UnsupportedConfiguration` for a non-zero dividend yield or a step
    /// count too coarse for the schedule; `InvalidInput` for dividends on or
    /// after expiry or exceeding the spot.
    pub fn price_with_dividends(
        &self,
        lattice: ConstantLattice,
        spec: &OptionSpec,
        market: &FlatMarket,
        dividends: &DividendSchedule,
    ) -> Result<Real> {
        validate_dividend_call(spec, market, dividends)?;
        if pre_empted(spec, market.spot) {
            return Ok(0.0);
        }
        let (params, mut ladder) = dividend_lattice(lattice, spec, market, dividends)?;
        Ok(induct(&spec.strategy(), &params, &mut ladder, None))
    }

    /// Price and Greeks with a discrete dividend schedule.
    ///
    /// Delta and gamma use the dividend-adjusted node prices at depths 1
    /// and 2.
    pub fn greeks_with_dividends(
        &self,
        lattice: ConstantLattice,
        spec: &OptionSpec,
        market: &FlatMarket,
        dividends: &DividendSchedule,
    ) -> Result<Greeks> {
        validate_dividend_call(spec, market, dividends)?;
        ensure_greek_steps(spec.steps)?;
        if pre_empted(spec, market.spot) {
            return Ok(Greeks::default());
        }
        let (params, mut ladder) = dividend_lattice(lattice, spec, market, dividends)?;
        let mut capture = GreekCapture::default();
        let price = induct(&spec.strategy(), &params, &mut ladder, Some(&mut capture));
        let nodes = capture.finish(price);
        let dt = market.time_to_expiry / spec.steps as Real;
        let theta = lattice.theta(
            market.spot,
            market.volatility,
            market.interest_rate,
            0.0,
            dt,
            &nodes,
        );
        Ok(greeks_from(nodes, theta))
    }

    // ─── Two assets ───────────────────────────────────────────────────────────

    /// Price a two-asset option on the correlated lattice.
    ///
    /// # Errors
    /// `InvalidInput` for bad contract or market scalars;
    /// `DegenerateParameters` if a joint probability leaves `(0, 1)`.
    pub fn price_two_asset(
        &self,
        spec: &TwoAssetOptionSpec,
        market: &TwoAssetMarket,
    ) -> Result<Real> {
        spec.validate()?;
        let params = CorrelatedLattice.parameters(market, spec.steps)?;
        log_correlated(spec, &params);
        let (mut ladder1, mut ladder2) = two_asset_ladders(market, &params);
        Ok(induct_two_asset(spec, &params, &mut ladder1, &mut ladder2, None))
    }

    /// Price and Greeks of a two-asset option.
    ///
    /// Theta is `(V(2)[1][1] − V₀)/(2dt)`.
    pub fn greeks_two_asset(
        &self,
        spec: &TwoAssetOptionSpec,
        market: &TwoAssetMarket,
    ) -> Result<TwoAssetGreeks> {
        spec.validate()?;
        ensure_greek_steps(spec.steps)?;
        let params = CorrelatedLattice.parameters(market, spec.steps)?;
        log_correlated(spec, &params);
        let (mut ladder1, mut ladder2) = two_asset_ladders(market, &params);
        let mut capture = TwoAssetCapture::default();
        let price = induct_two_asset(spec, &params, &mut ladder1, &mut ladder2, Some(&mut capture));
        Ok(capture.finish(price, params.dt))
    }
}

// ─── Backward induction ───────────────────────────────────────────────────────

/// Run the one-asset induction from expiry to the root.
///
/// The ladder is stepped back before each recursion so dividend corrections
/// due at a step are in place when that depth's node prices are read.
fn induct<F: OptionFunction1D>(
    function: &F,
    lattice: &Lattice,
    ladder: &mut AssetLadder,
    mut capture: Option<&mut GreekCapture>,
) -> Real {
    let steps = lattice.steps();
    let mut values = function.terminal_payoff(ladder, steps);
    for i in (0..steps).rev() {
        ladder.step_back(i);
        values = function.next_step_values(&lattice.step(i), &values, ladder, i);
        if let Some(c) = capture.as_deref_mut() {
            c.observe(i, &values, ladder);
        }
    }
    values[0]
}

fn induct_two_asset<F: OptionFunction2D>(
    function: &F,
    params: &CorrelatedParameters,
    ladder1: &mut AssetLadder,
    ladder2: &mut AssetLadder,
    mut capture: Option<&mut TwoAssetCapture>,
) -> Real {
    let steps = params.steps;
    let mut values: DMatrix<Real> = function.terminal_payoff(ladder1, ladder2, steps);
    for i in (0..steps).rev() {
        ladder1.step_back(i);
        ladder2.step_back(i);
        values = function.next_step_values(params, &values, ladder1, ladder2, i);
        if let Some(c) = capture.as_deref_mut() {
            c.observe(i, &values, ladder1, ladder2);
        }
    }
    values[(0, 0)]
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn ensure_greek_steps(steps: Size) -> Result<()> {
    ensure!(
        steps >= MIN_STEPS_FOR_GREEKS,
        "greeks need at least {MIN_STEPS_FOR_GREEKS} steps, got {steps}"
    );
    Ok(())
}

fn pre_empted(spec: &OptionSpec, spot: Real) -> bool {
    let out = spec.is_pre_empted(spot);
    if out {
        if let Some(barrier) = spec.barrier {
            debug!(
                spot,
                strike = spec.strike,
                level = barrier.level,
                direction = %barrier.direction,
                option_type = %spec.option_type,
                "barrier pre-empts the contract, returning zero"
            );
        }
    }
    out
}

fn constant_lattice(
    lattice: ConstantLattice,
    spec: &OptionSpec,
    market: &FlatMarket,
    cost_of_carry: Real,
) -> Result<Lattice> {
    let dt = market.time_to_expiry / spec.steps as Real;
    let params = lattice
        .parameters(
            market.spot,
            spec.strike,
            market.time_to_expiry,
            market.volatility,
            cost_of_carry,
            spec.steps,
            dt,
        )?
        .with_discount(market.interest_rate);
    debug!(
        ?lattice,
        steps = params.steps,
        dt = params.dt,
        up = params.up,
        down = params.down,
        up_probability = params.up_probability,
        discount = params.discount,
        barrier = ?spec.barrier.map(|b| b.direction),
        "constant lattice"
    );
    Ok(Lattice::Constant(params))
}

fn time_varying_lattice(spec: &OptionSpec, market: &TermMarket) -> Result<Lattice> {
    spec.validate()?;
    unsupported!(
        spec.barrier.is_none(),
        "barrier options are not supported with time-varying lattice parameters"
    );
    let params = TimeVaryingLattice.parameters(market, spec.steps)?;
    debug!(
        steps = params.per_step.len(),
        space_step = params.space_step,
        horizon = params.grid.end(),
        "time-varying lattice"
    );
    Ok(Lattice::TimeVarying(params))
}

fn validate_dividend_call(
    spec: &OptionSpec,
    market: &FlatMarket,
    dividends: &DividendSchedule,
) -> Result<()> {
    spec.validate()?;
    market.validate()?;
    unsupported!(
        market.dividend_yield == 0.0,
        "a continuous dividend yield cannot be combined with a dividend schedule, got {}",
        market.dividend_yield
    );
    dividends.validate(market.time_to_expiry)
}

fn dividend_lattice(
    lattice: ConstantLattice,
    spec: &OptionSpec,
    market: &FlatMarket,
    dividends: &DividendSchedule,
) -> Result<(Lattice, AssetLadder)> {
    let dt = market.time_to_expiry / spec.steps as Real;
    // the schedule stands in for the yield: carry at the risk-free rate
    let params = constant_lattice(lattice, spec, market, market.interest_rate)?;
    let ladder = AssetLadder::with_dividends(
        dividends,
        market.spot,
        market.interest_rate,
        dt,
        spec.steps,
        params.down(),
        params.up_over_down(),
    )?;
    debug!(
        kind = ?dividends.kind(),
        count = dividends.len(),
        total = dividends.dividends().iter().map(|d| d.amount).sum::<Real>(),
        adjusted_spot = ladder.base(),
        "dividend schedule"
    );
    Ok((params, ladder))
}

fn two_asset_ladders(
    market: &TwoAssetMarket,
    params: &CorrelatedParameters,
) -> (AssetLadder, AssetLadder) {
    let (down1, down2) = params.down();
    let (ratio1, ratio2) = params.up_over_down();
    (
        AssetLadder::new(market.spot1, down1, ratio1),
        AssetLadder::new(market.spot2, down2, ratio2),
    )
}

fn log_correlated(spec: &TwoAssetOptionSpec, params: &CorrelatedParameters) {
    debug!(
        payoff = ?spec.payoff,
        steps = params.steps,
        dt = params.dt,
        uu = params.uu,
        ud = params.ud,
        du = params.du,
        dd = params.dd,
        "correlated lattice"
    );
}

fn greeks_from(nodes: GreekNodes, theta: Real) -> Greeks {
    Greeks {
        price: nodes.price,
        delta: nodes.delta,
        gamma: nodes.gamma,
        theta,
    }
}
