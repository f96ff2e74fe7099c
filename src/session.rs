// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! Wallet session lifecycle and persistence.
//!
//! One session per running app: created `Disconnected`, optionally restored
//! from a validated persisted snapshot, moved to `Connected` only by an
//! explicit connect handshake. Connection failures surface a user-facing
//! message and are never fatal.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::bridge::WalletBridge;
use crate::storage::{SnapshotDb, WalletSnapshot};

/// Recognized address prefixes of the token network (user-friendly forms).
pub const ADDRESS_PREFIXES: [&str; 2] = ["EQ", "UQ"];

/// Minimum accepted address length.
pub const MIN_ADDRESS_LEN: usize = 48;

/// Whether an address matches the token network's canonical shape.
///
/// Persisted snapshots and bridge handshake results are only trusted if
/// their address passes this check.
pub fn is_valid_address(address: &str) -> bool {
    address.len() >= MIN_ADDRESS_LEN
        && ADDRESS_PREFIXES
            .iter()
            .any(|prefix| address.starts_with(prefix))
}

/// Connected account details.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedWallet {
    pub address: String,
    /// Informational only; never enforced against spend
    pub balance: f64,
}

/// Wallet session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletState {
    Disconnected,
    Connecting,
    Connected(ConnectedWallet),
    ConnectionFailed { reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("wallet bridge is not available in this environment")]
    BridgeUnavailable,

    #[error("wallet connection failed: {0}")]
    Handshake(String),

    #[error("wallet connection timed out")]
    TimedOut,
}

/// Mutable, session-scoped wallet state with snapshot persistence.
pub struct WalletSession {
    state: WalletState,
    store: SnapshotDb,
    connect_timeout: Duration,
}

impl WalletSession {
    /// Create a disconnected session over the given snapshot store.
    pub fn new(store: SnapshotDb, connect_timeout: Duration) -> Self {
        Self {
            state: WalletState::Disconnected,
            store,
            connect_timeout,
        }
    }

    pub fn state(&self) -> &WalletState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, WalletState::Connected(_))
    }

    /// Connected account, if any.
    pub fn connected(&self) -> Option<&ConnectedWallet> {
        match &self.state {
            WalletState::Connected(wallet) => Some(wallet),
            _ => None,
        }
    }

    /// Restore a previously saved session snapshot.
    ///
    /// The address is validated before it is trusted; invalid or unparseable
    /// snapshots are discarded and the stored copy removed. Recovery is
    /// silent (logged, never surfaced).
    pub fn restore_from_persisted(&mut self) -> &WalletState {
        match self.store.load() {
            Ok(Some(snapshot)) if is_valid_address(&snapshot.address) => {
                info!(address = %snapshot.address, "restored wallet session from snapshot");
                self.state = WalletState::Connected(ConnectedWallet {
                    address: snapshot.address,
                    balance: snapshot.balance,
                });
            }
            Ok(Some(snapshot)) => {
                warn!(
                    address = %snapshot.address,
                    "discarding persisted wallet snapshot with invalid address"
                );
                self.discard_snapshot();
                self.state = WalletState::Disconnected;
            }
            Ok(None) => {
                self.state = WalletState::Disconnected;
            }
            Err(error) => {
                warn!(error = %error, "discarding unreadable wallet snapshot");
                self.discard_snapshot();
                self.state = WalletState::Disconnected;
            }
        }
        &self.state
    }

    /// Run the connect handshake, bounded by the configured timeout.
    ///
    /// On success the snapshot is persisted and the session becomes
    /// `Connected`. On failure or timeout the session becomes
    /// `ConnectionFailed` and any previously persisted snapshot is left
    /// untouched.
    pub async fn connect(
        &mut self,
        bridge: &dyn WalletBridge,
    ) -> Result<ConnectedWallet, ConnectError> {
        if !bridge.is_available() {
            return Err(self.fail_connect(ConnectError::BridgeUnavailable));
        }

        self.state = WalletState::Connecting;

        match timeout(self.connect_timeout, bridge.request_connect()).await {
            Ok(Ok(account)) => {
                if !is_valid_address(&account.address) {
                    return Err(self.fail_connect(ConnectError::Handshake(format!(
                        "bridge returned a malformed address: {}",
                        account.address
                    ))));
                }

                let snapshot = WalletSnapshot {
                    address: account.address.clone(),
                    balance: account.balance,
                };
                if let Err(error) = self.store.save(&snapshot) {
                    // The session still works for this run; only restore is lost.
                    warn!(error = %error, "failed to persist wallet snapshot");
                }

                let wallet = ConnectedWallet {
                    address: account.address,
                    balance: account.balance,
                };
                info!(address = %wallet.address, "wallet connected");
                self.state = WalletState::Connected(wallet.clone());
                Ok(wallet)
            }
            Ok(Err(error)) => Err(self.fail_connect(ConnectError::Handshake(error.to_string()))),
            Err(_elapsed) => Err(self.fail_connect(ConnectError::TimedOut)),
        }
    }

    /// Clear in-memory and persisted state.
    pub fn disconnect(&mut self) {
        self.discard_snapshot();
        self.state = WalletState::Disconnected;
        info!("wallet disconnected");
    }

    fn fail_connect(&mut self, error: ConnectError) -> ConnectError {
        warn!(reason = %error, "wallet connection failed");
        self.state = WalletState::ConnectionFailed {
            reason: error.to_string(),
        };
        error
    }

    fn discard_snapshot(&self) {
        if let Err(error) = self.store.clear() {
            warn!(error = %error, "failed to remove persisted wallet snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MockBridge;
    use tempfile::TempDir;

    const VALID_ADDRESS: &str = "UQBDN8ARRy-7qUYEmx9v6IxaMmcfHrbTrh6ZiFVQnzmsqyBi";

    fn test_store() -> (TempDir, SnapshotDb) {
        let dir = TempDir::new().expect("temp dir");
        let db = SnapshotDb::open(&dir.path().join("wallet.redb")).expect("open db");
        (dir, db)
    }

    fn test_session(store: SnapshotDb) -> WalletSession {
        WalletSession::new(store, Duration::from_millis(200))
    }

    #[test]
    fn address_validation_checks_prefix_and_length() {
        assert!(is_valid_address(VALID_ADDRESS));
        assert!(is_valid_address(
            "EQAnotheraddresslongenoughtobeconsideredplausible0001"
        ));

        // Too short
        assert!(!is_valid_address("UQshort"));
        // Unrecognized prefix
        assert!(!is_valid_address(
            "XXBDN8ARRy-7qUYEmx9v6IxaMmcfHrbTrh6ZiFVQnzmsqyBi"
        ));
        assert!(!is_valid_address(""));
    }

    #[test]
    fn new_session_starts_disconnected() {
        let (_dir, store) = test_store();
        let session = test_session(store);
        assert_eq!(*session.state(), WalletState::Disconnected);
        assert!(!session.is_connected());
    }

    #[test]
    fn restore_accepts_valid_snapshot() {
        let (_dir, store) = test_store();
        store
            .save(&WalletSnapshot {
                address: VALID_ADDRESS.to_string(),
                balance: 42.0,
            })
            .unwrap();

        let mut session = test_session(store);
        session.restore_from_persisted();

        let wallet = session.connected().expect("connected after restore");
        assert_eq!(wallet.address, VALID_ADDRESS);
        assert_eq!(wallet.balance, 42.0);
    }

    #[test]
    fn restore_discards_short_address() {
        let (_dir, store) = test_store();
        store
            .save(&WalletSnapshot {
                address: "UQshort".to_string(),
                balance: 1.0,
            })
            .unwrap();

        let mut session = test_session(store);
        session.restore_from_persisted();

        assert_eq!(*session.state(), WalletState::Disconnected);
    }

    #[test]
    fn restore_discards_unrecognized_prefix_and_removes_stored_copy() {
        let (dir, store) = test_store();
        store
            .save(&WalletSnapshot {
                address: "XXBDN8ARRy-7qUYEmx9v6IxaMmcfHrbTrh6ZiFVQnzmsqyBi".to_string(),
                balance: 1.0,
            })
            .unwrap();

        let mut session = test_session(store);
        session.restore_from_persisted();
        assert_eq!(*session.state(), WalletState::Disconnected);

        // The stored copy is gone (reopen after releasing the file lock)
        drop(session);
        let store = SnapshotDb::open(&dir.path().join("wallet.redb")).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn restore_recovers_from_corrupt_snapshot() {
        let (dir, store) = test_store();
        store.save_raw("{\"address\": 12}").unwrap();

        let mut session = test_session(store);
        session.restore_from_persisted();
        assert_eq!(*session.state(), WalletState::Disconnected);

        drop(session);
        let store = SnapshotDb::open(&dir.path().join("wallet.redb")).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn connect_persists_snapshot_and_updates_state() {
        let (dir, store) = test_store();
        let mut session = test_session(store);
        let bridge = MockBridge::connected();

        let wallet = session.connect(&bridge).await.unwrap();
        assert_eq!(wallet.address, crate::bridge::mock::MOCK_ADDRESS);
        assert!(session.is_connected());

        drop(session);
        let store = SnapshotDb::open(&dir.path().join("wallet.redb")).unwrap();
        let snapshot = store.load().unwrap().expect("snapshot persisted");
        assert_eq!(snapshot.address, wallet.address);
        assert_eq!(snapshot.balance, wallet.balance);
    }

    #[tokio::test]
    async fn connect_rejects_malformed_bridge_address() {
        let (_dir, store) = test_store();
        let mut session = test_session(store);
        let bridge = MockBridge::connected().with_account("bogus", 1.0);

        let error = session.connect(&bridge).await.unwrap_err();
        assert!(matches!(error, ConnectError::Handshake(_)));
        assert!(matches!(
            session.state(),
            WalletState::ConnectionFailed { .. }
        ));
    }

    #[tokio::test]
    async fn connect_failure_sets_connection_failed() {
        let (_dir, store) = test_store();
        let mut session = test_session(store);
        let bridge = MockBridge::failing_connect("user declined");

        let error = session.connect(&bridge).await.unwrap_err();
        assert!(matches!(error, ConnectError::Handshake(_)));
        match session.state() {
            WalletState::ConnectionFailed { reason } => {
                assert!(reason.contains("user declined"));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connect_timeout_leaves_persisted_snapshot_untouched() {
        let (dir, store) = test_store();
        let previous = WalletSnapshot {
            address: VALID_ADDRESS.to_string(),
            balance: 5.0,
        };
        store.save(&previous).unwrap();

        let mut session = test_session(store);
        let bridge = MockBridge::hanging_connect();

        let error = session.connect(&bridge).await.unwrap_err();
        assert!(matches!(error, ConnectError::TimedOut));
        assert!(matches!(
            session.state(),
            WalletState::ConnectionFailed { .. }
        ));

        drop(session);
        let store = SnapshotDb::open(&dir.path().join("wallet.redb")).unwrap();
        assert_eq!(store.load().unwrap(), Some(previous));
    }

    #[tokio::test]
    async fn connect_with_unavailable_bridge() {
        let (_dir, store) = test_store();
        let mut session = test_session(store);
        let bridge = MockBridge::unavailable();

        let error = session.connect(&bridge).await.unwrap_err();
        assert!(matches!(error, ConnectError::BridgeUnavailable));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn disconnect_clears_memory_and_disk() {
        let (dir, store) = test_store();
        let mut session = test_session(store);
        session.connect(&MockBridge::connected()).await.unwrap();

        session.disconnect();
        assert_eq!(*session.state(), WalletState::Disconnected);

        drop(session);
        let store = SnapshotDb::open(&dir.path().join("wallet.redb")).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
