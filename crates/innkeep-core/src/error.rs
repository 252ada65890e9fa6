//! Error types for `innkeep-core`.
//!
//! Every failure carries enough context to be surfaced to the staff member
//! who triggered the action. [`Error::kind`] buckets the variants into the
//! four propagation classes the API layer maps to HTTP statuses.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::reservation::ReservationStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("guest name is required")]
  MissingGuestName,

  #[error("service charge must be positive, got {0}")]
  NonPositiveCharge(Decimal),

  #[error("room not found: {0}")]
  RoomNotFound(Uuid),

  #[error("reservation not found: {0}")]
  ReservationNotFound(Uuid),

  #[error("invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("reservation {id} is {status}; cannot {action}")]
  IneligibleStatus {
    id:     Uuid,
    status: ReservationStatus,
    action: &'static str,
  },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The propagation class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Missing or malformed required input; never retried.
  Validation,
  /// A referenced record id does not resolve.
  NotFound,
  /// A transition attempted from an ineligible status.
  Conflict,
  /// The backing store failed; surfaced for visibility, retried only by
  /// the user re-issuing the action.
  Storage,
}

impl Error {
  /// Wrap a backend error. Used by the front desk to lift store failures
  /// into the core taxonomy.
  pub fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::MissingGuestName | Self::NonPositiveCharge(_) => {
        ErrorKind::Validation
      }
      Self::RoomNotFound(_)
      | Self::ReservationNotFound(_)
      | Self::InvoiceNotFound(_) => ErrorKind::NotFound,
      Self::IneligibleStatus { .. } => ErrorKind::Conflict,
      Self::Storage(_) => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
