//! Error types for the MeterStream ledger.
//!
//! All errors use the `MS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Stream creation / validation errors
//! - 2xx: Authorization errors
//! - 3xx: Lookup errors
//! - 4xx: Funds movement errors
//! - 5xx: Lifecycle state errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::StreamId;

/// Central error enum for all MeterStream operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // =================================================================
    // Creation / Validation Errors (1xx)
    // =================================================================
    /// The deposit failed validation: zero, or too small to fund a single
    /// second at the stream's rate.
    #[error("MS_ERR_100: Invalid deposit: {reason}")]
    InvalidDeposit { reason: String },

    /// The per-second rate must be strictly positive.
    #[error("MS_ERR_101: Rate per second must be greater than zero")]
    InvalidRate,

    /// The payee account is unusable (null, or same as the payer).
    #[error("MS_ERR_102: Invalid payee: {reason}")]
    InvalidPayee { reason: String },

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The caller does not hold the role this operation requires.
    #[error("MS_ERR_200: Unauthorized: caller is not the {required_role}")]
    Unauthorized { required_role: String },

    // =================================================================
    // Lookup Errors (3xx)
    // =================================================================
    /// The requested stream does not exist.
    #[error("MS_ERR_300: Stream not found: {0}")]
    StreamNotFound(StreamId),

    // =================================================================
    // Funds Movement Errors (4xx)
    // =================================================================
    /// The vault refused to move funds (insufficient balance or approval).
    #[error("MS_ERR_400: Funds transfer failed: {reason}")]
    FundsTransferFailed { reason: String },

    /// The payee has no accrued funds to withdraw right now.
    #[error("MS_ERR_401: Nothing to withdraw from {0}")]
    NothingToWithdraw(StreamId),

    // =================================================================
    // Lifecycle State Errors (5xx)
    // =================================================================
    /// The stream is halted; accrual-side mutations are refused.
    #[error("MS_ERR_500: Stream is halted: {0}")]
    StreamHalted(StreamId),

    /// The stream was terminated early by its payer.
    #[error("MS_ERR_501: Stream is terminated: {0}")]
    StreamTerminated(StreamId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// An amount computation exceeded `u128` range.
    #[error("MS_ERR_900: Amount overflow during {context}")]
    AmountOverflow { context: String },

    /// Custody conservation check failed. Critical safety alert.
    #[error("MS_ERR_901: Custody invariant violation: {reason}")]
    CustodyInvariantViolation { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;
