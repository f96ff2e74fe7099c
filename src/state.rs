// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! Application context wiring the core components together.
//!
//! `App` owns the session, oracle, revenue model and payment flow, plus the
//! calculator input the UI binds to. The host environment is probed once at
//! construction and the result memoized for the session lifetime.

use std::sync::Arc;

use tracing::info;

use crate::bridge::{BridgeAvailability, HostEnvironment, MockBridge, WalletBridge};
use crate::config::{AppConfig, BridgeTransport};
use crate::investment::{quote, InvestmentQuote};
use crate::payment::{PaymentError, PaymentFlow, PendingPayment};
use crate::pricing::PriceOracle;
use crate::revenue::RevenueModel;
use crate::session::{ConnectError, ConnectedWallet, WalletSession, WalletState};
use crate::storage::{SnapshotDb, SnapshotDbError};

/// Filename of the snapshot database inside the data directory.
const SNAPSHOT_DB_FILE: &str = "wallet.redb";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("snapshot store error: {0}")]
    Storage(#[from] SnapshotDbError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("the mock bridge requires transport `mock` to be configured explicitly")]
    MockNotConfigured,
}

/// Top-level application state.
pub struct App {
    config: AppConfig,
    model: RevenueModel,
    oracle: PriceOracle,
    bridge: Arc<dyn WalletBridge>,
    availability: BridgeAvailability,
    session: WalletSession,
    flow: PaymentFlow,
    input_percentage: f64,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("model", &self.model)
            .field("availability", &self.availability)
            .field("session", &self.session.state())
            .field("input_percentage", &self.input_percentage)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Construct the app around a host-provided wallet bridge.
    ///
    /// Opens the snapshot store, probes the host environment once and
    /// restores any valid persisted session.
    pub fn new(
        config: AppConfig,
        environment: &HostEnvironment,
        bridge: Arc<dyn WalletBridge>,
    ) -> Result<Self, AppError> {
        let availability = environment.detect();
        info!(availability = ?availability, "host bridge probe completed");

        let store = SnapshotDb::open(&config.data_dir.join(SNAPSHOT_DB_FILE))?;
        let oracle = PriceOracle::new(&config)?;

        let mut session = WalletSession::new(store, config.connect_timeout);
        session.restore_from_persisted();

        let flow = PaymentFlow::new(
            config.limits,
            config.treasury_address.clone(),
            config.transfer_timeout,
            Arc::clone(&bridge),
        );

        Ok(Self {
            input_percentage: config.limits.min_percentage,
            model: RevenueModel::cosmo_life(),
            oracle,
            bridge,
            availability,
            session,
            flow,
            config,
        })
    }

    /// Construct the app with the built-in mock bridge.
    ///
    /// Refused unless the configuration explicitly selects the mock
    /// transport; the simulated wallet is never a default behavior.
    pub fn with_mock_bridge(
        config: AppConfig,
        environment: &HostEnvironment,
    ) -> Result<Self, AppError> {
        if config.transport != BridgeTransport::Mock {
            return Err(AppError::MockNotConfigured);
        }
        Self::new(config, environment, Arc::new(MockBridge::connected()))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn revenue_model(&self) -> &RevenueModel {
        &self.model
    }

    /// Memoized result of the startup capability probe.
    pub fn bridge_availability(&self) -> BridgeAvailability {
        self.availability
    }

    pub fn wallet_state(&self) -> &WalletState {
        self.session.state()
    }

    pub fn input_percentage(&self) -> f64 {
        self.input_percentage
    }

    /// Update the calculator input. Values outside the configured limits are
    /// ignored and reported as rejected.
    pub fn set_input_percentage(&mut self, percentage: f64) -> bool {
        if self.config.limits.contains(percentage) {
            self.input_percentage = percentage;
            true
        } else {
            false
        }
    }

    /// Quote the current calculator input at a fresh price snapshot.
    pub async fn current_quote(&self) -> InvestmentQuote {
        let price = self.oracle.token_price_usd().await;
        quote(self.input_percentage, price, &self.model)
    }

    /// Run the wallet connect handshake.
    pub async fn connect_wallet(&mut self) -> Result<ConnectedWallet, ConnectError> {
        self.session.connect(self.bridge.as_ref()).await
    }

    /// Clear the wallet session, in memory and on disk.
    pub fn disconnect_wallet(&mut self) {
        self.session.disconnect();
    }

    /// Quote the current input and submit it as an investment payment.
    ///
    /// After a submission reaches the transport, the calculator input is
    /// reset to the minimum percentage. Validation failures leave it as-is.
    pub async fn invest(&mut self, user_id: &str) -> Result<PendingPayment, PaymentError> {
        let quote = self.current_quote().await;
        let payment = self.flow.submit(&quote, &self.session, user_id).await?;
        self.input_percentage = self.config.limits.min_percentage;
        Ok(payment)
    }
}
