//! Market inputs for a single pricing call.
//!
//! Upstream collaborators read spot, volatility and rates off their curve and
//! surface objects and hand them over as one of these value objects.

use tl_core::{ensure, ensure_finite, ensure_positive, Rate, Real, Result, Size, Time, Volatility};

/// Flat (constant-parameter) market data for one underlying.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatMarket {
    /// Spot price of the underlying.
    pub spot: Real,
    /// Time to expiry in years.
    pub time_to_expiry: Time,
    /// Black volatility.
    pub volatility: Volatility,
    /// Continuously compounded risk-free rate.
    pub interest_rate: Rate,
    /// Continuous dividend yield.
    pub dividend_yield: Rate,
}

impl FlatMarket {
    /// Create a new flat market.
    pub fn new(
        spot: Real,
        time_to_expiry: Time,
        volatility: Volatility,
        interest_rate: Rate,
        dividend_yield: Rate,
    ) -> Self {
        Self {
            spot,
            time_to_expiry,
            volatility,
            interest_rate,
            dividend_yield,
        }
    }

    /// Cost of carry `b = r − q`.
    pub fn cost_of_carry(&self) -> Rate {
        self.interest_rate - self.dividend_yield
    }

    /// Check that all scalars are finite and in their domain.
    pub fn validate(&self) -> Result<()> {
        ensure_positive(self.spot, "spot")?;
        ensure_positive(self.time_to_expiry, "time to expiry")?;
        ensure_positive(self.volatility, "volatility")?;
        ensure_finite(self.interest_rate, "interest rate")?;
        ensure_finite(self.dividend_yield, "dividend yield")?;
        Ok(())
    }
}

/// Per-step (time-varying) market data for one underlying.
///
/// Entry `i` of each vector applies to the lattice step from depth `i` to
/// depth `i + 1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermMarket {
    /// Spot price of the underlying.
    pub spot: Real,
    /// Time to expiry in years.
    pub time_to_expiry: Time,
    /// Per-step volatilities.
    pub volatilities: Vec<Volatility>,
    /// Per-step risk-free rates.
    pub interest_rates: Vec<Rate>,
    /// Per-step dividend yields.
    pub dividend_yields: Vec<Rate>,
}

impl TermMarket {
    /// Create a new term market.
    pub fn new(
        spot: Real,
        time_to_expiry: Time,
        volatilities: Vec<Volatility>,
        interest_rates: Vec<Rate>,
        dividend_yields: Vec<Rate>,
    ) -> Self {
        Self {
            spot,
            time_to_expiry,
            volatilities,
            interest_rates,
            dividend_yields,
        }
    }

    /// A term market with the same value at every step.
    pub fn flat(market: &FlatMarket, steps: Size) -> Self {
        Self {
            spot: market.spot,
            time_to_expiry: market.time_to_expiry,
            volatilities: vec![market.volatility; steps],
            interest_rates: vec![market.interest_rate; steps],
            dividend_yields: vec![market.dividend_yield; steps],
        }
    }

    /// Check scalars and per-step vectors against the step count.
    pub fn validate(&self, steps: Size) -> Result<()> {
        ensure_positive(self.spot, "spot")?;
        ensure_positive(self.time_to_expiry, "time to expiry")?;
        ensure!(
            self.volatilities.len() == steps,
            "wrong volatility length: {} for {steps} steps",
            self.volatilities.len()
        );
        ensure!(
            self.interest_rates.len() == steps,
            "wrong interest rate length: {} for {steps} steps",
            self.interest_rates.len()
        );
        ensure!(
            self.dividend_yields.len() == steps,
            "wrong dividend yield length: {} for {steps} steps",
            self.dividend_yields.len()
        );
        for i in 0..steps {
            ensure_positive(self.volatilities[i], "volatility")?;
            ensure_finite(self.interest_rates[i], "interest rate")?;
            ensure_finite(self.dividend_yields[i], "dividend yield")?;
        }
        Ok(())
    }
}

/// Flat market data for two correlated underlyings sharing one discount rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoAssetMarket {
    /// Spot price of the first asset.
    pub spot1: Real,
    /// Spot price of the second asset.
    pub spot2: Real,
    /// Time to expiry in years.
    pub time_to_expiry: Time,
    /// Volatility of the first asset.
    pub volatility1: Volatility,
    /// Volatility of the second asset.
    pub volatility2: Volatility,
    /// Correlation between the two log-returns.
    pub correlation: Real,
    /// Continuously compounded risk-free rate.
    pub interest_rate: Rate,
    /// Dividend yield of the first asset.
    pub dividend_yield1: Rate,
    /// Dividend yield of the second asset.
    pub dividend_yield2: Rate,
}

impl TwoAssetMarket {
    /// Check that all scalars are finite and in their domain.
    pub fn validate(&self) -> Result<()> {
        ensure_positive(self.spot1, "spot1")?;
        ensure_positive(self.spot2, "spot2")?;
        ensure_positive(self.time_to_expiry, "time to expiry")?;
        ensure_positive(self.volatility1, "volatility1")?;
        ensure_positive(self.volatility2, "volatility2")?;
        ensure!(
            (-1.0..=1.0).contains(&self.correlation),
            "correlation should be -1 <= rho <= 1, got {}",
            self.correlation
        );
        ensure_finite(self.interest_rate, "interest rate")?;
        ensure_finite(self.dividend_yield1, "dividend yield1")?;
        ensure_finite(self.dividend_yield2, "dividend yield2")?;
        Ok(())
    }
}
