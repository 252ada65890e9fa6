//! Reservation — the central entity whose status drives room status and
//! invoice creation.
//!
//! The status machine is a strict progression:
//!
//! ```text
//! Confirmed --check_in--> CheckedIn --check_out--> CheckedOut
//! Confirmed --cancel----------------------------->  Cancelled
//! ```
//!
//! `CheckedOut` and `Cancelled` are terminal. There is exactly one
//! `Confirmed` spelling; storage backends must encode it as a single
//! canonical string.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::room::RoomSnapshot;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
  Confirmed,
  CheckedIn,
  CheckedOut,
  Cancelled,
}

impl ReservationStatus {
  /// No transition ever leaves a terminal status.
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::CheckedOut | Self::Cancelled)
  }

  /// Whether a reservation in this status is still holding its room.
  pub fn holds_room(&self) -> bool {
    matches!(self, Self::Confirmed | Self::CheckedIn)
  }
}

impl std::fmt::Display for ReservationStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::Confirmed => "confirmed",
      Self::CheckedIn => "checked_in",
      Self::CheckedOut => "checked_out",
      Self::Cancelled => "cancelled",
    };
    f.write_str(s)
  }
}

/// Guest contact details, copied verbatim onto the invoice at check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
  pub name:  String,
  pub email: Option<String>,
  pub phone: Option<String>,
}

/// A booking record.
///
/// `room` is a frozen [`RoomSnapshot`] taken when the booking was made (or
/// last amended); the live room is looked up by `room_id` for status changes
/// only. `notes` is an append-only log of posted service charges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
  pub reservation_id: Uuid,
  pub guest:          Guest,
  pub room_id:        Uuid,
  pub room:           RoomSnapshot,
  pub check_in:       NaiveDate,
  pub check_out:      NaiveDate,
  pub guest_count:    u32,
  pub total_amount:   Decimal,
  pub notes:          String,
  pub status:         ReservationStatus,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::FrontDesk::book`].
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
  pub guest:       Guest,
  pub room_id:     Uuid,
  pub check_in:    NaiveDate,
  pub check_out:   NaiveDate,
  pub guest_count: u32,
}

/// Input to [`crate::FrontDesk::amend_booking`]. Only accepted while the
/// reservation is still `Confirmed`; the total is recomputed from the
/// resulting room and dates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmendBooking {
  pub room_id:     Option<Uuid>,
  pub check_in:    Option<NaiveDate>,
  pub check_out:   Option<NaiveDate>,
  pub guest_count: Option<u32>,
}
