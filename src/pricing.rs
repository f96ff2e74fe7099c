// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! Token price oracle backed by a public price feed.
//!
//! The feed is untrusted: the response body is validated before use and any
//! failure (network, non-2xx status, malformed body, missing or non-numeric
//! field) resolves to the configured fallback price. Callers never see an
//! error. Results are not cached; callers that need a stable value must
//! snapshot it themselves, as `InvestmentQuote` does.

use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::config::AppConfig;

/// JSON pointer to the USD price inside the feed response
/// (`{"the-open-network": {"usd": 2.5}}`).
const PRICE_JSON_POINTER: &str = "/the-open-network/usd";

/// Why one price fetch was discarded. Recovered locally via the fallback
/// price; never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("price feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("price feed returned status {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("price feed response is missing a numeric USD price")]
    MissingPrice,

    #[error("price feed returned a non-positive price: {0}")]
    InvalidPrice(f64),
}

/// TON/USD price oracle.
pub struct PriceOracle {
    http: Client,
    feed_url: String,
    fallback_usd: f64,
}

impl PriceOracle {
    /// Create an oracle from the runtime configuration.
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.price_request_timeout)
            .build()?;

        Ok(Self {
            http,
            feed_url: config.price_feed_url.clone(),
            fallback_usd: config.price_fallback_usd,
        })
    }

    /// Current token price in USD.
    ///
    /// Infallible: any fetch or validation failure resolves to the fallback
    /// constant.
    pub async fn token_price_usd(&self) -> f64 {
        match self.fetch().await {
            Ok(price) => price,
            Err(reason) => {
                warn!(
                    error = %reason,
                    fallback = self.fallback_usd,
                    "price feed unavailable, using fallback price"
                );
                self.fallback_usd
            }
        }
    }

    async fn fetch(&self) -> Result<f64, OracleError> {
        let response = self.http.get(&self.feed_url).send().await?;

        if !response.status().is_success() {
            return Err(OracleError::BadStatus(response.status()));
        }

        let body: Value = response.json().await?;
        parse_price(&body)
    }
}

/// Extract and validate the USD price from an untrusted feed response.
fn parse_price(body: &Value) -> Result<f64, OracleError> {
    let price = body
        .pointer(PRICE_JSON_POINTER)
        .and_then(Value::as_f64)
        .ok_or(OracleError::MissingPrice)?;

    if !price.is_finite() || price <= 0.0 {
        return Err(OracleError::InvalidPrice(price));
    }

    Ok(price)
}
