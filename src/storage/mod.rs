// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! # Persistent Storage Module
//!
//! One embedded database holds the single wallet session snapshot. The
//! snapshot is overwritten atomically on every successful connect and removed
//! on invalidation or disconnect; there is exactly one writer (the active
//! session) and one read at startup.

pub mod snapshot;

pub use snapshot::{SnapshotDb, SnapshotDbError, SnapshotDbResult, WalletSnapshot};
