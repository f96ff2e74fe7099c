// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! Embedded wallet-snapshot store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `wallet_session`: well-known storage key → JSON-encoded `WalletSnapshot`
//!
//! A single key is ever written; the table exists so the storage key stays a
//! stable, externally-documented contract.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

/// Single table: storage key → JSON-encoded snapshot.
const WALLET_SESSION: TableDefinition<&str, &str> = TableDefinition::new("wallet_session");

/// Well-known storage key for the persisted session snapshot.
pub const WALLET_SNAPSHOT_KEY: &str = "telegram_wallet_data";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotDbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type SnapshotDbResult<T> = Result<T, SnapshotDbError>;

/// Persisted wallet session state: address + informational balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub address: String,
    pub balance: f64,
}

/// Embedded ACID store for the wallet session snapshot.
pub struct SnapshotDb {
    db: Database,
}

impl SnapshotDb {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> SnapshotDbResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WALLET_SESSION)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Read the persisted snapshot, if any.
    ///
    /// A value that fails to parse surfaces as `Serde`; the caller decides
    /// whether to discard it.
    pub fn load(&self) -> SnapshotDbResult<Option<WalletSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLET_SESSION)?;
        match table.get(WALLET_SNAPSHOT_KEY)? {
            Some(value) => {
                let snapshot: WalletSnapshot = serde_json::from_str(value.value())?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// Overwrite the persisted snapshot.
    pub fn save(&self, snapshot: &WalletSnapshot) -> SnapshotDbResult<()> {
        let json = serde_json::to_string(snapshot)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(WALLET_SESSION)?;
            table.insert(WALLET_SNAPSHOT_KEY, json.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove the persisted snapshot. Removing an absent snapshot is a no-op.
    pub fn clear(&self) -> SnapshotDbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(WALLET_SESSION)?;
            table.remove(WALLET_SNAPSHOT_KEY)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Store a raw string under the snapshot key, bypassing serialization.
    /// Lets tests exercise the corrupt-snapshot recovery path.
    #[cfg(test)]
    pub(crate) fn save_raw(&self, value: &str) -> SnapshotDbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(WALLET_SESSION)?;
            table.insert(WALLET_SNAPSHOT_KEY, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, SnapshotDb) {
        let dir = TempDir::new().expect("temp dir");
        let db = SnapshotDb::open(&dir.path().join("wallet.redb")).expect("open db");
        (dir, db)
    }

    fn sample_snapshot() -> WalletSnapshot {
        WalletSnapshot {
            address: "UQBDN8ARRy-7qUYEmx9v6IxaMmcfHrbTrh6ZiFVQnzmsqyBi".to_string(),
            balance: 100.0,
        }
    }

    #[test]
    fn empty_store_loads_none() {
        let (_dir, db) = test_db();
        assert_eq!(db.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, db) = test_db();
        let snapshot = sample_snapshot();

        db.save(&snapshot).unwrap();
        assert_eq!(db.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let (_dir, db) = test_db();
        db.save(&sample_snapshot()).unwrap();

        let replacement = WalletSnapshot {
            address: "EQAnotheraddresslongenoughtobeconsideredplausible0001".to_string(),
            balance: 7.5,
        };
        db.save(&replacement).unwrap();

        assert_eq!(db.load().unwrap(), Some(replacement));
    }

    #[test]
    fn clear_removes_snapshot_and_is_idempotent() {
        let (_dir, db) = test_db();
        db.save(&sample_snapshot()).unwrap();

        db.clear().unwrap();
        assert_eq!(db.load().unwrap(), None);

        // Clearing again must not error
        db.clear().unwrap();
    }

    #[test]
    fn corrupt_value_surfaces_as_serde_error() {
        let (_dir, db) = test_db();
        db.save_raw("{not json").unwrap();

        assert!(matches!(db.load(), Err(SnapshotDbError::Serde(_))));
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("wallet.redb");
        let snapshot = sample_snapshot();

        {
            let db = SnapshotDb::open(&path).unwrap();
            db.save(&snapshot).unwrap();
        }

        let db = SnapshotDb::open(&path).unwrap();
        assert_eq!(db.load().unwrap(), Some(snapshot));
    }
}
