//! Vanilla European and American options on the constant-parameter lattices.

mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use common::{black_scholes, black_scholes_greeks, standard_market, ALL_LATTICES};
use tl_lattice::{BinomialTreeEngine, ConstantLattice, Error, FlatMarket, OptionSpec, OptionType};

#[test]
fn european_call_converges_to_black_scholes() {
    let engine = BinomialTreeEngine::new();
    let m = standard_market();
    let reference = black_scholes(OptionType::Call, &m, 100.0);
    assert_relative_eq!(reference, 10.4506, epsilon = 1e-4);
    for lattice in ALL_LATTICES {
        let spec = OptionSpec::european(OptionType::Call, 100.0, 501);
        let price = engine.price(lattice, &spec, &m).unwrap();
        assert_abs_diff_eq!(price, reference, epsilon = 1e-2);
    }
}

#[test]
fn european_put_with_yield_converges() {
    let engine = BinomialTreeEngine::new();
    let m = FlatMarket::new(100.0, 1.0, 0.3, 0.03, 0.01);
    let reference = black_scholes(OptionType::Put, &m, 110.0);
    for lattice in ALL_LATTICES {
        let spec = OptionSpec::european(OptionType::Put, 110.0, 501);
        let price = engine.price(lattice, &spec, &m).unwrap();
        assert_abs_diff_eq!(price, reference, epsilon = 1e-2);
    }
}

#[test]
fn error_shrinks_with_steps() {
    let engine = BinomialTreeEngine::new();
    let m = standard_market();
    let reference = black_scholes(OptionType::Call, &m, 100.0);
    let error = |steps| {
        let spec = OptionSpec::european(OptionType::Call, 100.0, steps);
        (engine.price(ConstantLattice::CoxRossRubinstein, &spec, &m).unwrap() - reference).abs()
    };
    let (e50, e200, e800) = (error(50), error(200), error(800));
    assert!(e200 < e50 && e800 < e200);
    // roughly first order
    assert!(e50 / e200 > 2.5);
}

#[test]
fn leisen_reimer_converges_fast() {
    let engine = BinomialTreeEngine::new();
    let m = standard_market();
    let spec = OptionSpec::european(OptionType::Call, 100.0, 101);
    let price = engine.price(ConstantLattice::LeisenReimer, &spec, &m).unwrap();
    assert_abs_diff_eq!(price, black_scholes(OptionType::Call, &m, 100.0), epsilon = 1e-3);
}

#[test]
fn leisen_reimer_rejects_even_steps() {
    let spec = OptionSpec::european(OptionType::Call, 100.0, 100);
    let res = BinomialTreeEngine::new().price(ConstantLattice::LeisenReimer, &spec, &standard_market());
    assert!(matches!(res, Err(Error::InvalidInput(_))));
}

#[test]
fn two_hundred_step_scenario() {
    let spec = OptionSpec::european(OptionType::Call, 100.0, 200);
    let price = BinomialTreeEngine::new()
        .price(ConstantLattice::Tian, &spec, &standard_market())
        .unwrap();
    assert_abs_diff_eq!(price, 10.45, epsilon = 1e-2);
}

#[test]
fn put_call_parity_holds_at_every_step_count() {
    let engine = BinomialTreeEngine::new();
    let m = FlatMarket::new(100.0, 1.0, 0.2, 0.05, 0.02);
    let forward_value = m.spot * (-0.02_f64).exp() - 95.0 * (-0.05_f64).exp();
    for steps in [2, 3, 10, 51, 200] {
        let call = engine
            .price(ConstantLattice::CoxRossRubinstein, &OptionSpec::european(OptionType::Call, 95.0, steps), &m)
            .unwrap();
        let put = engine
            .price(ConstantLattice::CoxRossRubinstein, &OptionSpec::european(OptionType::Put, 95.0, steps), &m)
            .unwrap();
        assert_abs_diff_eq!(call - put, forward_value, epsilon = 1e-10);
    }
}

#[test]
fn american_put_is_worth_more_than_european() {
    let engine = BinomialTreeEngine::new();
    let m = FlatMarket::new(100.0, 1.0, 0.2, 0.05, 0.03);
    let eu = engine
        .price(ConstantLattice::CoxRossRubinstein, &OptionSpec::european(OptionType::Put, 110.0, 100), &m)
        .unwrap();
    let am = engine
        .price(ConstantLattice::CoxRossRubinstein, &OptionSpec::american(OptionType::Put, 110.0, 100), &m)
        .unwrap();
    assert!(am > eu + 0.5, "american {am} vs european {eu}");
}

#[test]
fn american_call_without_yield_matches_european() {
    let engine = BinomialTreeEngine::new();
    let m = standard_market();
    let eu = engine
        .price(ConstantLattice::CoxRossRubinstein, &OptionSpec::european(OptionType::Call, 100.0, 150), &m)
        .unwrap();
    let am = engine
        .price(ConstantLattice::CoxRossRubinstein, &OptionSpec::american(OptionType::Call, 100.0, 150), &m)
        .unwrap();
    assert_abs_diff_eq!(am, eu, epsilon = 1e-10);
}

#[test]
fn greeks_match_black_scholes() {
    let engine = BinomialTreeEngine::new();
    let m = standard_market();
    let (delta, gamma, theta) = black_scholes_greeks(OptionType::Call, &m, 100.0);
    for lattice in ALL_LATTICES {
        let spec = OptionSpec::european(OptionType::Call, 100.0, 201);
        let g = engine.greeks(lattice, &spec, &m).unwrap();
        let price = engine.price(lattice, &spec, &m).unwrap();
        assert_abs_diff_eq!(g.price, price, epsilon = 1e-12);
        assert_abs_diff_eq!(g.delta, delta, epsilon = 2e-3);
        assert_abs_diff_eq!(g.gamma, gamma, epsilon = 2e-4);
        assert_abs_diff_eq!(g.theta, theta, epsilon = 3e-2);
    }
}

#[test]
fn put_delta_is_negative() {
    let g = BinomialTreeEngine::new()
        .greeks(
            ConstantLattice::Trigeorgis,
            &OptionSpec::american(OptionType::Put, 100.0, 100),
            &standard_market(),
        )
        .unwrap();
    assert!(g.delta < 0.0 && g.delta > -1.0);
    assert!(g.gamma > 0.0);
}

#[test]
fn invalid_market_inputs_are_rejected() {
    let engine = BinomialTreeEngine::new();
    let spec = OptionSpec::european(OptionType::Call, 100.0, 10);
    for m in [
        FlatMarket::new(0.0, 1.0, 0.2, 0.05, 0.0),
        FlatMarket::new(100.0, f64::INFINITY, 0.2, 0.05, 0.0),
        FlatMarket::new(100.0, 1.0, 0.0, 0.05, 0.0),
        FlatMarket::new(100.0, 1.0, 0.2, f64::NAN, 0.0),
    ] {
        assert!(matches!(
            engine.price(ConstantLattice::CoxRossRubinstein, &spec, &m),
            Err(Error::InvalidInput(_))
        ));
    }
}
