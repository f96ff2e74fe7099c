// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! Host wallet bridge seam.
//!
//! The Telegram wallet bridge is an external collaborator: the embedding
//! shell provides the live implementation. This module defines the contract
//! the core consumes, the capability probe over host environment signals,
//! and a deterministic mock transport for development builds and tests.
//!
//! Bridge absence is a normal state, not an exception; the probe runs once
//! at startup and its result is memoized for the session lifetime.

pub mod mock;

use async_trait::async_trait;

pub use mock::MockBridge;

/// Account details returned by a successful connect handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeAccount {
    /// Opaque account address as reported by the host wallet
    pub address: String,
    /// Informational balance in tokens; never authoritative
    pub balance: f64,
}

/// Terminal outcome reported by the transfer transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Confirmed,
    Rejected,
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("wallet bridge is not available in this environment")]
    Unavailable,

    #[error("wallet bridge request failed: {0}")]
    Request(String),
}

/// Contract of the host wallet bridge.
///
/// Handshakes and transfers are not required to complete synchronously; the
/// caller bounds each await with its configured timeout.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Whether the host bridge is present at all.
    fn is_available(&self) -> bool;

    /// Initiate the connect handshake with the host wallet.
    async fn request_connect(&self) -> Result<BridgeAccount, BridgeError>;

    /// Hand a transfer to the host wallet for execution.
    async fn request_transfer(
        &self,
        to: &str,
        amount: f64,
        memo: &str,
    ) -> Result<TransferStatus, BridgeError>;
}

/// Result of the startup capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeAvailability {
    Available,
    Unavailable,
}

/// Host environment signals used to decide whether the bridge is present.
///
/// The embedding shell fills these from its runtime; defaults describe a
/// plain browser with no host integration.
#[derive(Debug, Clone, Default)]
pub struct HostEnvironment {
    /// The host exposes its WebApp API object
    pub has_webapp_object: bool,
    /// Browser user-agent string
    pub user_agent: String,
    /// Document referrer
    pub referrer: String,
    /// Raw query string of the launch URL (without leading `?`)
    pub query: String,
}

impl HostEnvironment {
    /// Capability probe: any one positive signal marks the bridge available.
    pub fn detect(&self) -> BridgeAvailability {
        if self.has_webapp_object
            || self.user_agent.contains("Telegram")
            || self.query_has_webapp_params()
            || self.referrer.contains("t.me")
        {
            BridgeAvailability::Available
        } else {
            BridgeAvailability::Unavailable
        }
    }

    fn query_has_webapp_params(&self) -> bool {
        url::form_urlencoded::parse(self.query.as_bytes())
            .any(|(key, _)| key == "tgWebAppData" || key == "tgWebAppVersion")
    }
}
