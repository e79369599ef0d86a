//! # tl-lattice
//!
//! Binomial lattice option pricing: parameter derivation, payoff and
//! recursion strategies, discrete dividends, knock-out barriers, a correlated
//! two-asset tree, and Greeks captured during backward induction.
//!
//! # Modules
//!
//! * [`lattice`] — constant, time-varying and correlated lattice parameters,
//!   the time grid and the underlying price ladder
//! * [`dividends`] — proportional and cash dividend schedules
//! * [`functions`] — vanilla, barrier and two-asset payoff strategies
//! * [`option`] / [`market`] — per-call contract and market value objects
//! * [`greeks`] — finite-difference Greeks and their result types
//! * [`engine`] — [`BinomialTreeEngine`], the entry points
//!
//! # Example
//!
//! ```
//! use tl_lattice::{Barrier, BinomialTreeEngine, ConstantLattice, FlatMarket, OptionSpec, OptionType};
//!
//! let engine = BinomialTreeEngine::new();
//! let market = FlatMarket::new(100.0, 1.0, 0.2, 0.05, 0.0);
//! let vanilla = OptionSpec::european(OptionType::Call, 100.0, 200);
//! let knock_out = vanilla.with_barrier(Barrier::down_and_out(80.0));
//!
//! let v = engine.price(ConstantLattice::CoxRossRubinstein, &vanilla, &market).unwrap();
//! let b = engine.price(ConstantLattice::CoxRossRubinstein, &knock_out, &market).unwrap();
//! assert!(0.0 < b && b < v);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Dividend schedules and their per-step corrections.
pub mod dividends;

/// Backward-induction entry points.
pub mod engine;

/// Payoff and one-step recursion strategies.
pub mod functions;

/// Greeks results and finite-difference extraction.
pub mod greeks;

/// Lattice parameter providers, time grid and price ladder.
pub mod lattice;

/// Market inputs.
pub mod market;

/// Contract specifications.
pub mod option;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use tl_core::{Error, Result};

pub use dividends::{Dividend, DividendKind, DividendSchedule};
pub use engine::BinomialTreeEngine;
pub use functions::{
    BarrierFunction, OptionFunction1D, OptionFunction2D, PayoffStrategy, VanillaFunction,
};
pub use greeks::{GreekNodes, Greeks, TwoAssetGreeks};
pub use lattice::{
    AssetLadder, ConstantLattice, CorrelatedLattice, CorrelatedParameters, Lattice,
    LatticeParameters, StepParameters, TimeGrid, TimeVaryingLattice, TimeVaryingParameters,
};
pub use market::{FlatMarket, TermMarket, TwoAssetMarket};
pub use option::{
    Barrier, BarrierDirection, ExerciseStyle, OptionSpec, OptionType, TwoAssetOptionSpec,
    TwoAssetPayoff,
};
