use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use tl_lattice::{
    BinomialTreeEngine, ConstantLattice, DividendSchedule, FlatMarket, OptionSpec, OptionType,
    TwoAssetMarket, TwoAssetOptionSpec,
};

fn market() -> FlatMarket {
    FlatMarket::new(100.0, 1.0, 0.2, 0.05, 0.0)
}

fn bench_american_put(c: &mut Criterion) {
    let engine = BinomialTreeEngine::new();
    let m = market();
    let mut group = c.benchmark_group("american_put_crr");
    for steps in [100usize, 500, 1000] {
        let spec = OptionSpec::american(OptionType::Put, 100.0, steps);
        group.bench_with_input(BenchmarkId::from_parameter(steps), &spec, |b, spec| {
            b.iter(|| {
                engine
                    .price(ConstantLattice::CoxRossRubinstein, black_box(spec), black_box(&m))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_greeks(c: &mut Criterion) {
    let engine = BinomialTreeEngine::new();
    let m = market();
    let spec = OptionSpec::american(OptionType::Put, 100.0, 501);
    c.bench_function("greeks_leisen_reimer_501", |b| {
        b.iter(|| {
            engine
                .greeks(ConstantLattice::LeisenReimer, black_box(&spec), black_box(&m))
                .unwrap()
        })
    });
}

fn bench_cash_dividends(c: &mut Criterion) {
    let engine = BinomialTreeEngine::new();
    let m = market();
    let spec = OptionSpec::american(OptionType::Call, 100.0, 500);
    let dividends = DividendSchedule::cash(&[0.25, 0.5, 0.75], &[1.0, 1.0, 1.0]).unwrap();
    c.bench_function("american_call_cash_dividends_500", |b| {
        b.iter(|| {
            engine
                .price_with_dividends(
                    ConstantLattice::CoxRossRubinstein,
                    black_box(&spec),
                    black_box(&m),
                    &dividends,
                )
                .unwrap()
        })
    });
}

fn bench_two_asset(c: &mut Criterion) {
    let engine = BinomialTreeEngine::new();
    let m = TwoAssetMarket {
        spot1: 100.0,
        spot2: 95.0,
        time_to_expiry: 1.0,
        volatility1: 0.2,
        volatility2: 0.25,
        correlation: 0.4,
        interest_rate: 0.05,
        dividend_yield1: 0.0,
        dividend_yield2: 0.0,
    };
    let mut group = c.benchmark_group("spread_call_two_asset");
    for steps in [50usize, 100, 200] {
        let spec = TwoAssetOptionSpec::spread(OptionType::Call, 5.0, steps);
        group.bench_with_input(BenchmarkId::from_parameter(steps), &spec, |b, spec| {
            b.iter(|| engine.price_two_asset(black_box(spec), black_box(&m)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_american_put,
    bench_greeks,
    bench_cash_dividends,
    bench_two_asset
);
criterion_main!(benches);
