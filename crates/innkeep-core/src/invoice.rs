//! Invoice — one billing record per checked-in stay.
//!
//! Created exactly once, at the Confirmed → CheckedIn transition, and
//! decoupled from the reservation afterwards: guest and room details are
//! frozen snapshots, and the stay amount never changes. Only the explicit
//! charge-sync at check-out and settlement touch the mutable fields.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  reservation::{Guest, Reservation},
  room::RoomSnapshot,
};

/// Payment status. There is no partial-payment state; an invoice becomes
/// `Paid` exactly when settlement sets amount paid equal to amount due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Unpaid,
  Paid,
}

/// A billing record for one stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
  pub invoice_id:     Uuid,
  pub reservation_id: Uuid,
  pub guest:          Guest,
  pub room:           RoomSnapshot,
  pub check_in:       NaiveDate,
  pub check_out:      NaiveDate,
  /// The reservation total at check-in; frozen thereafter.
  pub stay_amount:    Decimal,
  /// What the guest owes; starts at `stay_amount`, updated from the
  /// reservation total at check-out if still unpaid.
  pub amount_due:     Decimal,
  /// Monotonically non-decreasing; set equal to `amount_due` on settlement.
  pub amount_paid:    Decimal,
  pub status:         InvoiceStatus,
  pub invoice_date:   DateTime<Utc>,
  pub due_date:       DateTime<Utc>,
  pub payment_date:   Option<DateTime<Utc>>,
}

impl Invoice {
  /// Issue the invoice for a stay opening at `now`. Payment is due within
  /// 24 hours of issue.
  pub fn issue(reservation: &Reservation, now: DateTime<Utc>) -> Self {
    Self {
      invoice_id:     Uuid::new_v4(),
      reservation_id: reservation.reservation_id,
      guest:          reservation.guest.clone(),
      room:           reservation.room.clone(),
      check_in:       reservation.check_in,
      check_out:      reservation.check_out,
      stay_amount:    reservation.total_amount,
      amount_due:     reservation.total_amount,
      amount_paid:    Decimal::ZERO,
      status:         InvoiceStatus::Unpaid,
      invoice_date:   now,
      due_date:       now + chrono::Duration::hours(24),
      payment_date:   None,
    }
  }
}
