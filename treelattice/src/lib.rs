//! # treelattice
//!
//! Lattice option pricing: Cox-Ross-Rubinstein, Jarrow-Rudd, Trigeorgis,
//! Tian and Leisen-Reimer trees, a time-varying tree driven by per-step
//! market vectors, and a correlated two-asset tree.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `tl-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! treelattice = "0.1"
//! ```
//!
//! ```rust
//! use treelattice::lattice::{
//!     BinomialTreeEngine, ConstantLattice, FlatMarket, OptionSpec, OptionType,
//! };
//!
//! let market = FlatMarket::new(100.0, 1.0, 0.2, 0.05, 0.0);
//! let put = OptionSpec::american(OptionType::Put, 100.0, 101);
//! let greeks = BinomialTreeEngine::new()
//!     .greeks(ConstantLattice::LeisenReimer, &put, &market)
//!     .unwrap();
//! assert!(greeks.price > 5.5 && greeks.price < 6.5);
//! assert!(greeks.delta < 0.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Scalar aliases and error definitions.
pub use tl_core as core;

/// Lattices, payoff functions, dividend schedules and the tree engine.
pub use tl_lattice as lattice;
