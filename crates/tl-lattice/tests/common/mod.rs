//! Shared fixtures and closed-form references for the scenario tests.

#![allow(dead_code)]

use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use tl_lattice::{FlatMarket, OptionType};

pub const ALL_LATTICES: [tl_lattice::ConstantLattice; 5] = [
    tl_lattice::ConstantLattice::CoxRossRubinstein,
    tl_lattice::ConstantLattice::JarrowRudd,
    tl_lattice::ConstantLattice::Trigeorgis,
    tl_lattice::ConstantLattice::Tian,
    tl_lattice::ConstantLattice::LeisenReimer,
];

/// spot 100, one year, 20 % vol, 5 % rate, no yield.
pub fn standard_market() -> FlatMarket {
    FlatMarket::new(100.0, 1.0, 0.2, 0.05, 0.0)
}

fn std_normal() -> Normal {
    Normal::new(0.0, 1.0).unwrap()
}

pub fn norm_cdf(x: f64) -> f64 {
    std_normal().cdf(x)
}

pub fn norm_pdf(x: f64) -> f64 {
    std_normal().pdf(x)
}

fn d1_d2(m: &FlatMarket, strike: f64) -> (f64, f64) {
    let std_dev = m.volatility * m.time_to_expiry.sqrt();
    let d1 = ((m.spot / strike).ln()
        + (m.interest_rate - m.dividend_yield + 0.5 * m.volatility * m.volatility)
            * m.time_to_expiry)
        / std_dev;
    (d1, d1 - std_dev)
}

/// Black-Scholes-Merton price.
pub fn black_scholes(option_type: OptionType, m: &FlatMarket, strike: f64) -> f64 {
    let phi = option_type.sign();
    let (d1, d2) = d1_d2(m, strike);
    let df_r = (-m.interest_rate * m.time_to_expiry).exp();
    let df_q = (-m.dividend_yield * m.time_to_expiry).exp();
    phi * (m.spot * df_q * norm_cdf(phi * d1) - strike * df_r * norm_cdf(phi * d2))
}

/// Black-Scholes-Merton `(delta, gamma, theta)`.
pub fn black_scholes_greeks(option_type: OptionType, m: &FlatMarket, strike: f64) -> (f64, f64, f64) {
    let phi = option_type.sign();
    let (d1, d2) = d1_d2(m, strike);
    let t = m.time_to_expiry;
    let df_r = (-m.interest_rate * t).exp();
    let df_q = (-m.dividend_yield * t).exp();
    let delta = phi * df_q * norm_cdf(phi * d1);
    let gamma = df_q * norm_pdf(d1) / (m.spot * m.volatility * t.sqrt());
    let theta = -m.spot * df_q * norm_pdf(d1) * m.volatility / (2.0 * t.sqrt())
        - phi * m.interest_rate * strike * df_r * norm_cdf(phi * d2)
        + phi * m.dividend_yield * m.spot * df_q * norm_cdf(phi * d1);
    (delta, gamma, theta)
}
