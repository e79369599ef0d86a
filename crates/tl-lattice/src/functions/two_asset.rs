//! Two-asset payoffs on the correlated lattice.

use nalgebra::DMatrix;
use tl_core::{Real, Size};

use super::OptionFunction2D;
use crate::lattice::{AssetLadder, CorrelatedParameters};
use crate::option::{ExerciseStyle, TwoAssetOptionSpec, TwoAssetPayoff};

impl TwoAssetOptionSpec {
    /// Payoff for the asset prices `(s1, s2)`.
    pub fn payoff(&self, s1: Real, s2: Real) -> Real {
        let sign = self.option_type.sign();
        let k = self.strike;
        match self.payoff {
            TwoAssetPayoff::Spread => (sign * (s1 - s2 - k)).max(0.0),
            TwoAssetPayoff::Product => (sign * (s1 * s2 - k)).max(0.0),
            TwoAssetPayoff::Maximum => (sign * (s1.max(s2) - k)).max(0.0),
            TwoAssetPayoff::Minimum => (sign * (s1.min(s2) - k)).max(0.0),
            TwoAssetPayoff::Exchange {
                quantity1,
                quantity2,
            } => (quantity1 * s1 - quantity2 * s2).max(0.0),
            TwoAssetPayoff::Correlation { strike2 } => {
                if sign * (s1 - k) > 0.0 {
                    (sign * (s2 - strike2)).max(0.0)
                } else {
                    0.0
                }
            }
        }
    }
}

impl OptionFunction2D for TwoAssetOptionSpec {
    fn terminal_payoff(
        &self,
        ladder1: &AssetLadder,
        ladder2: &AssetLadder,
        steps: Size,
    ) -> DMatrix<Real> {
        let p1: Vec<Real> = ladder1.prices(steps).collect();
        let p2: Vec<Real> = ladder2.prices(steps).collect();
        DMatrix::from_fn(steps + 1, steps + 1, |j, i| self.payoff(p1[j], p2[i]))
    }

    fn next_step_values(
        &self,
        params: &CorrelatedParameters,
        values: &DMatrix<Real>,
        ladder1: &AssetLadder,
        ladder2: &AssetLadder,
        depth: Size,
    ) -> DMatrix<Real> {
        let american = self.exercise == ExerciseStyle::American;
        let p1: Vec<Real> = ladder1.prices(depth).collect();
        let p2: Vec<Real> = ladder2.prices(depth).collect();
        DMatrix::from_fn(depth + 1, depth + 1, |j, i| {
            let continuation = params.continuation(
                values[(j + 1, i + 1)],
                values[(j + 1, i)],
                values[(j, i + 1)],
                values[(j, i)],
            );
            if american {
                continuation.max(self.payoff(p1[j], p2[i]))
            } else {
                continuation
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::OptionType;
    use approx::assert_abs_diff_eq;

    fn spec(payoff: TwoAssetPayoff, option_type: OptionType) -> TwoAssetOptionSpec {
        TwoAssetOptionSpec::new(payoff, option_type, 10.0, 4, ExerciseStyle::European)
    }

    #[test]
    fn payoff_shapes() {
        assert_abs_diff_eq!(spec(TwoAssetPayoff::Spread, OptionType::Call).payoff(120.0, 100.0), 10.0);
        assert_abs_diff_eq!(spec(TwoAssetPayoff::Spread, OptionType::Put).payoff(100.0, 100.0), 10.0);
        assert_abs_diff_eq!(spec(TwoAssetPayoff::Product, OptionType::Call).payoff(3.0, 5.0), 5.0);
        assert_abs_diff_eq!(spec(TwoAssetPayoff::Maximum, OptionType::Call).payoff(8.0, 13.0), 3.0);
        assert_abs_diff_eq!(spec(TwoAssetPayoff::Minimum, OptionType::Put).payoff(8.0, 13.0), 2.0);
        let exchange = TwoAssetPayoff::Exchange {
            quantity1: 2.0,
            quantity2: 1.0,
        };
        assert_abs_diff_eq!(spec(exchange, OptionType::Put).payoff(6.0, 9.0), 3.0);
    }

    #[test]
    fn correlation_payoff_needs_first_asset_in_the_money() {
        let s = spec(TwoAssetPayoff::Correlation { strike2: 50.0 }, OptionType::Call);
        assert_abs_diff_eq!(s.payoff(9.0, 70.0), 0.0);
        assert_abs_diff_eq!(s.payoff(11.0, 70.0), 20.0);
        assert_abs_diff_eq!(s.payoff(11.0, 40.0), 0.0);
    }

    #[test]
    fn one_step_is_weighted_average() {
        let s = spec(TwoAssetPayoff::Maximum, OptionType::Call);
        let l1 = AssetLadder::new(10.0, 0.5, 4.0);
        let l2 = AssetLadder::new(10.0, 0.5, 4.0);
        let terminal = s.terminal_payoff(&l1, &l2, 1);
        // prices 5 / 20 on both assets
        assert_abs_diff_eq!(terminal[(0, 0)], 0.0);
        assert_abs_diff_eq!(terminal[(1, 0)], 10.0);
        assert_abs_diff_eq!(terminal[(0, 1)], 10.0);
        assert_abs_diff_eq!(terminal[(1, 1)], 10.0);
        let params = CorrelatedParameters {
            steps: 1,
            dt: 1.0,
            discount: 0.9,
            dx1: 0.1,
            dx2: 0.1,
            uu: 0.4,
            ud: 0.1,
            du: 0.2,
            dd: 0.3,
        };
        let v = s.next_step_values(&params, &terminal, &l1, &l2, 0);
        assert_eq!(v.shape(), (1, 1));
        assert_abs_diff_eq!(v[(0, 0)], 0.9 * 10.0 * 0.7, epsilon = 1e-12);
    }
}
