// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! Deterministic mock wallet transport.
//!
//! Used by tests and by development builds that explicitly configure
//! `BridgeTransport::Mock`; never reachable by default.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{BridgeAccount, BridgeError, TransferStatus, WalletBridge};

/// Placeholder account address the mock connects with.
pub const MOCK_ADDRESS: &str = "UQBmockaddressfortestingpurposesonlynotreal12345678";

/// Informational balance of the mock account, in tokens.
pub const MOCK_BALANCE: f64 = 100.0;

/// Sleep long enough that any realistic caller timeout fires first.
const HANG: Duration = Duration::from_secs(86_400);

#[derive(Debug, Clone)]
enum ConnectScript {
    Succeed,
    Fail(String),
    Hang,
}

#[derive(Debug, Clone)]
enum TransferScript {
    Confirm,
    Reject,
    Fail(String),
    Hang,
}

/// Scripted wallet bridge with configurable latency and outcomes.
pub struct MockBridge {
    available: bool,
    latency: Duration,
    account: BridgeAccount,
    connect: ConnectScript,
    transfer: TransferScript,
    transfer_calls: AtomicUsize,
}

impl MockBridge {
    /// A bridge that connects with the placeholder account and confirms
    /// every transfer.
    pub fn connected() -> Self {
        Self {
            available: true,
            latency: Duration::ZERO,
            account: BridgeAccount {
                address: MOCK_ADDRESS.to_string(),
                balance: MOCK_BALANCE,
            },
            connect: ConnectScript::Succeed,
            transfer: TransferScript::Confirm,
            transfer_calls: AtomicUsize::new(0),
        }
    }

    /// A bridge whose host environment has no wallet integration.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::connected()
        }
    }

    /// A bridge whose handshake fails with the given reason.
    pub fn failing_connect(reason: impl Into<String>) -> Self {
        Self {
            connect: ConnectScript::Fail(reason.into()),
            ..Self::connected()
        }
    }

    /// A bridge whose handshake never completes.
    pub fn hanging_connect() -> Self {
        Self {
            connect: ConnectScript::Hang,
            ..Self::connected()
        }
    }

    /// A bridge that rejects every transfer.
    pub fn rejecting_transfers() -> Self {
        Self {
            transfer: TransferScript::Reject,
            ..Self::connected()
        }
    }

    /// A bridge whose transfer transport errors with the given reason.
    pub fn failing_transfers(reason: impl Into<String>) -> Self {
        Self {
            transfer: TransferScript::Fail(reason.into()),
            ..Self::connected()
        }
    }

    /// A bridge whose transfers never complete.
    pub fn hanging_transfers() -> Self {
        Self {
            transfer: TransferScript::Hang,
            ..Self::connected()
        }
    }

    /// Add simulated latency before every response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Connect with a specific account instead of the placeholder.
    pub fn with_account(mut self, address: impl Into<String>, balance: f64) -> Self {
        self.account = BridgeAccount {
            address: address.into(),
            balance,
        };
        self
    }

    /// How many transfers have been handed to this transport.
    pub fn transfer_call_count(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl WalletBridge for MockBridge {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_connect(&self) -> Result<BridgeAccount, BridgeError> {
        if !self.available {
            return Err(BridgeError::Unavailable);
        }
        self.simulate_latency().await;

        match &self.connect {
            ConnectScript::Succeed => Ok(self.account.clone()),
            ConnectScript::Fail(reason) => Err(BridgeError::Request(reason.clone())),
            ConnectScript::Hang => {
                tokio::time::sleep(HANG).await;
                Err(BridgeError::Request("handshake never completed".to_string()))
            }
        }
    }

    async fn request_transfer(
        &self,
        _to: &str,
        _amount: f64,
        _memo: &str,
    ) -> Result<TransferStatus, BridgeError> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);

        if !self.available {
            return Err(BridgeError::Unavailable);
        }
        self.simulate_latency().await;

        match &self.transfer {
            TransferScript::Confirm => Ok(TransferStatus::Confirmed),
            TransferScript::Reject => Ok(TransferStatus::Rejected),
            TransferScript::Fail(reason) => Err(BridgeError::Request(reason.clone())),
            TransferScript::Hang => {
                tokio::time::sleep(HANG).await;
                Err(BridgeError::Request("transfer never completed".to_string()))
            }
        }
    }
}
