// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! fixed product parameters of the offering. Configuration is loaded from the
//! environment at startup; the product parameters are compile-time constants.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `COSMO_DATA_DIR` | Root directory for the snapshot database | `./data` |
//! | `COSMO_PRICE_FEED_URL` | Public price-feed endpoint for the token | CoinGecko simple-price |
//! | `COSMO_BRIDGE_TRANSPORT` | Wallet transport (`live` or `mock`) | `live` |
//!
//! The mock transport is a development aid and must be requested explicitly;
//! any unrecognized value falls back to `live`.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::investment::InvestmentLimits;

/// Environment variable name for the snapshot database directory.
pub const DATA_DIR_ENV: &str = "COSMO_DATA_DIR";

/// Environment variable name for the price-feed endpoint override.
pub const PRICE_FEED_URL_ENV: &str = "COSMO_PRICE_FEED_URL";

/// Environment variable name for the wallet transport selection.
pub const BRIDGE_TRANSPORT_ENV: &str = "COSMO_BRIDGE_TRANSPORT";

/// Default directory for persistent data.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default public price feed: TON/USD from CoinGecko.
pub const DEFAULT_PRICE_FEED_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=the-open-network&vs_currencies=usd";

/// Tokens sold per one percentage point of ownership (1% = 1,000 TON).
///
/// Fixed term of the offering, not a derived quantity.
pub const TOKEN_PER_PERCENT: f64 = 1_000.0;

/// Fallback TON/USD price used when the feed is unreachable or malformed.
pub const FALLBACK_TOKEN_PRICE_USD: f64 = 2.5;

/// Treasury address receiving investment payments.
pub const TREASURY_ADDRESS: &str = "UQBDN8ARRy-7qUYEmx9v6IxaMmcfHrbTrh6ZiFVQnzmsqyBi";

/// Request timeout for one price-feed fetch.
pub const PRICE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on the wallet connect handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on one transfer handed to the wallet transport.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(60);

/// Wallet transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeTransport {
    /// Host-provided wallet bridge (production).
    Live,
    /// Built-in deterministic mock (development and tests only).
    Mock,
}

impl BridgeTransport {
    /// Parse a transport name. Only an explicit `mock` selects the mock
    /// transport; everything else resolves to `Live`.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("mock") {
            Self::Mock
        } else {
            Self::Live
        }
    }
}

impl Default for BridgeTransport {
    fn default() -> Self {
        Self::Live
    }
}

/// Runtime configuration for the application core.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the snapshot database.
    pub data_dir: PathBuf,
    /// Price-feed endpoint for the token's USD price.
    pub price_feed_url: String,
    /// Price returned when the feed cannot be used.
    pub price_fallback_usd: f64,
    /// Request timeout for one price fetch.
    pub price_request_timeout: Duration,
    /// Upper bound on the connect handshake.
    pub connect_timeout: Duration,
    /// Upper bound on one transfer.
    pub transfer_timeout: Duration,
    /// Allowed ownership percentage range.
    pub limits: InvestmentLimits,
    /// Address receiving investment payments.
    pub treasury_address: String,
    /// Wallet transport selection.
    pub transport: BridgeTransport,
}

impl AppConfig {
    /// Load configuration from the environment, filling gaps with defaults.
    pub fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(env_or_default(DATA_DIR_ENV, DEFAULT_DATA_DIR)),
            price_feed_url: env_or_default(PRICE_FEED_URL_ENV, DEFAULT_PRICE_FEED_URL),
            transport: BridgeTransport::parse(&env_or_default(BRIDGE_TRANSPORT_ENV, "live")),
            ..Self::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            price_feed_url: DEFAULT_PRICE_FEED_URL.to_string(),
            price_fallback_usd: FALLBACK_TOKEN_PRICE_USD,
            price_request_timeout: PRICE_REQUEST_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            transfer_timeout: TRANSFER_TIMEOUT,
            limits: InvestmentLimits::default(),
            treasury_address: TREASURY_ADDRESS.to_string(),
            transport: BridgeTransport::Live,
        }
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
