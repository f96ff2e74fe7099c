// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! Investment quote arithmetic.
//!
//! Pure transforms from a requested ownership percentage to a token cost,
//! USD cost and projected annual return. Range validation belongs to the
//! caller; `quote` neither clamps nor rejects out-of-range input.

use serde::Serialize;

use crate::config::TOKEN_PER_PERCENT;
use crate::revenue::RevenueModel;

/// Allowed ownership percentage range for one investment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentLimits {
    pub min_percentage: f64,
    pub max_percentage: f64,
}

impl InvestmentLimits {
    /// Whether `percentage` is a finite value inside the allowed range.
    pub fn contains(&self, percentage: f64) -> bool {
        percentage.is_finite()
            && percentage >= self.min_percentage
            && percentage <= self.max_percentage
    }
}

impl Default for InvestmentLimits {
    fn default() -> Self {
        Self {
            min_percentage: 0.01,
            max_percentage: 20.0,
        }
    }
}

/// Computed cost/return snapshot for one percentage and price.
///
/// Never persisted; always recomputed from current inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvestmentQuote {
    /// Requested ownership percentage
    pub percentage: f64,
    /// Cost in tokens: `percentage × TOKEN_PER_PERCENT`
    pub token_amount: f64,
    /// Oracle price snapshot at quote time
    pub token_price_usd: f64,
    /// Cost in USD: `token_amount × token_price_usd`
    pub usd_amount: f64,
    /// `(percentage / 100) × total projected annual revenue`
    pub projected_annual_return: f64,
}

impl InvestmentQuote {
    /// Projected yearly return relative to cost, as a percentage.
    pub fn roi_percent(&self) -> f64 {
        self.projected_annual_return / self.usd_amount * 100.0
    }
}

/// Compute a quote for the given percentage and price snapshot.
///
/// Deterministic and side-effect free. `percentage` must be finite; the
/// caller is responsible for range validation.
pub fn quote(percentage: f64, token_price_usd: f64, model: &RevenueModel) -> InvestmentQuote {
    let token_amount = percentage * TOKEN_PER_PERCENT;
    let usd_amount = token_amount * token_price_usd;
    let projected_annual_return = (percentage / 100.0) * model.total_projected_annual_revenue();

    InvestmentQuote {
        percentage,
        token_amount,
        token_price_usd,
        usd_amount,
        projected_annual_return,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_percent_at_three_dollars() {
        let model = RevenueModel::cosmo_life();
        let q = quote(1.0, 3.0, &model);

        assert_eq!(q.token_amount, 1_000.0);
        assert_eq!(q.usd_amount, 3_000.0);
        assert_eq!(q.projected_annual_return, 163_750.0);
        assert_eq!(q.token_price_usd, 3.0);
    }

    #[test]
    fn usd_amount_matches_closed_form_and_is_monotone() {
        let model = RevenueModel::cosmo_life();
        let price = 2.5;

        let mut previous = f64::NEG_INFINITY;
        for percentage in [0.01, 0.1, 1.0, 5.0, 10.0, 20.0] {
            let q = quote(percentage, price, &model);
            assert_eq!(q.usd_amount, percentage * TOKEN_PER_PERCENT * price);
            assert!(q.usd_amount > previous);
            previous = q.usd_amount;
        }
    }

    #[test]
    fn projected_return_is_linear_in_percentage() {
        let model = RevenueModel::cosmo_life();
        let single = quote(2.0, 2.5, &model);
        let double = quote(4.0, 2.5, &model);
        assert_eq!(
            double.projected_annual_return,
            2.0 * single.projected_annual_return
        );
    }

    #[test]
    fn roi_is_independent_of_percentage() {
        let model = RevenueModel::cosmo_life();
        let small = quote(0.01, 2.5, &model);
        let large = quote(20.0, 2.5, &model);
        assert!((small.roi_percent() - large.roi_percent()).abs() < 1e-9);
    }

    #[test]
    fn limits_accept_boundaries_and_reject_outside() {
        let limits = InvestmentLimits::default();

        assert!(limits.contains(0.01));
        assert!(limits.contains(20.0));
        assert!(limits.contains(1.0));

        assert!(!limits.contains(0.0));
        assert!(!limits.contains(0.009));
        assert!(!limits.contains(20.001));
        assert!(!limits.contains(f64::NAN));
        assert!(!limits.contains(f64::INFINITY));
    }
}
