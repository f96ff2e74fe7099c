// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Cosmo Life

//! Payment flow: validation and simulated transfer execution.
//!
//! One attempt moves through
//! `Validating → Submitted → Confirmed | Rejected | TimedOut`; validation
//! failures reject before anything reaches the transport. There is no
//! automatic retry; resubmission is user-initiated.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::bridge::{TransferStatus, WalletBridge};
use crate::investment::{InvestmentLimits, InvestmentQuote};
use crate::session::WalletSession;

/// Terminal status of one payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Submitted,
    Confirmed,
    Rejected,
    TimedOut,
}

/// Ephemeral record of one investment attempt. Not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PendingPayment {
    pub id: String,
    pub amount_token: f64,
    pub destination_address: String,
    /// Correlation string combining percentage and user id
    pub memo: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("wallet is not connected")]
    WalletNotConnected,

    #[error("ownership percentage {percentage} is outside the allowed range {min}%..{max}%")]
    OutOfRange {
        percentage: f64,
        min: f64,
        max: f64,
    },
}

/// Validates investment requests and drives transfers through the wallet
/// transport.
pub struct PaymentFlow {
    limits: InvestmentLimits,
    destination: String,
    transfer_timeout: Duration,
    bridge: Arc<dyn WalletBridge>,
}

impl PaymentFlow {
    pub fn new(
        limits: InvestmentLimits,
        destination: impl Into<String>,
        transfer_timeout: Duration,
        bridge: Arc<dyn WalletBridge>,
    ) -> Self {
        Self {
            limits,
            destination: destination.into(),
            transfer_timeout,
            bridge,
        }
    }

    /// Validate the quoted investment and hand it to the wallet transport.
    ///
    /// Returns `Err` only for validation failures; transport outcomes
    /// (including timeout) are reported through the payment's terminal
    /// status.
    pub async fn submit(
        &self,
        quote: &InvestmentQuote,
        session: &WalletSession,
        user_id: &str,
    ) -> Result<PendingPayment, PaymentError> {
        if !session.is_connected() {
            return Err(PaymentError::WalletNotConnected);
        }

        if !self.limits.contains(quote.percentage) {
            return Err(PaymentError::OutOfRange {
                percentage: quote.percentage,
                min: self.limits.min_percentage,
                max: self.limits.max_percentage,
            });
        }

        let mut payment = PendingPayment {
            id: Uuid::new_v4().to_string(),
            amount_token: quote.token_amount,
            destination_address: self.destination.clone(),
            memo: build_memo(quote.percentage, user_id),
            status: PaymentStatus::Submitted,
            created_at: Utc::now(),
        };

        info!(
            payment_id = %payment.id,
            amount_token = payment.amount_token,
            memo = %payment.memo,
            "submitting investment payment"
        );

        let outcome = timeout(
            self.transfer_timeout,
            self.bridge
                .request_transfer(&self.destination, payment.amount_token, &payment.memo),
        )
        .await;

        payment.status = match outcome {
            Ok(Ok(TransferStatus::Confirmed)) => {
                info!(payment_id = %payment.id, "payment confirmed");
                PaymentStatus::Confirmed
            }
            Ok(Ok(TransferStatus::Rejected)) => {
                warn!(payment_id = %payment.id, "payment rejected by wallet");
                PaymentStatus::Rejected
            }
            Ok(Err(error)) => {
                warn!(payment_id = %payment.id, error = %error, "payment transport failed");
                PaymentStatus::Rejected
            }
            Err(_elapsed) => {
                warn!(payment_id = %payment.id, "payment timed out");
                PaymentStatus::TimedOut
            }
        };

        Ok(payment)
    }
}

/// Correlation memo: `CosmoLife_{percentage}%_{user_id}`.
fn build_memo(percentage: f64, user_id: &str) -> String {
    format!("CosmoLife_{percentage}%_{user_id}")
}
