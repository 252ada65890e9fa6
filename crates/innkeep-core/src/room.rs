//! Room — the physical inventory unit.
//!
//! Rooms are durable: once created they are never deleted, only their status
//! moves. Status is mutated exclusively by the front desk's lifecycle
//! transitions or by an explicit housekeeping/staff override.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The comfort class of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
  Standard,
  Deluxe,
  Suite,
  Penthouse,
}

/// Occupancy/housekeeping status. A room is in exactly one of these at any
/// point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
  Available,
  Occupied,
  Cleaning,
  Maintenance,
}

impl RoomStatus {
  pub fn is_available(&self) -> bool { matches!(self, Self::Available) }
}

/// A room record. The nightly rate is a decimal so stay totals carry the
/// rate's own precision, with no float drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
  pub room_id:      Uuid,
  /// Unique, sortable display number (e.g. "204", "PH-1").
  pub number:       String,
  pub room_type:    RoomType,
  pub floor:        i32,
  pub capacity:     u32,
  pub nightly_rate: Decimal,
  pub amenities:    Vec<String>,
  pub status:       RoomStatus,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::PropertyStore::add_room`].
/// The id, creation timestamp, and initial `Available` status are assigned
/// by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
  pub number:       String,
  pub room_type:    RoomType,
  pub floor:        i32,
  pub capacity:     u32,
  pub nightly_rate: Decimal,
  #[serde(default)]
  pub amenities:    Vec<String>,
}

/// Partial update merged into an existing room record. `None` fields are
/// left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomPatch {
  pub number:       Option<String>,
  pub room_type:    Option<RoomType>,
  pub floor:        Option<i32>,
  pub capacity:     Option<u32>,
  pub nightly_rate: Option<Decimal>,
  pub amenities:    Option<Vec<String>>,
  pub status:       Option<RoomStatus>,
}

impl RoomPatch {
  /// A patch that changes only the status — the staff-override path.
  pub fn status_only(status: RoomStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  /// Apply this patch on top of `room`, consuming both.
  pub fn apply_to(self, mut room: Room) -> Room {
    if let Some(number) = self.number {
      room.number = number;
    }
    if let Some(room_type) = self.room_type {
      room.room_type = room_type;
    }
    if let Some(floor) = self.floor {
      room.floor = floor;
    }
    if let Some(capacity) = self.capacity {
      room.capacity = capacity;
    }
    if let Some(nightly_rate) = self.nightly_rate {
      room.nightly_rate = nightly_rate;
    }
    if let Some(amenities) = self.amenities {
      room.amenities = amenities;
    }
    if let Some(status) = self.status {
      room.status = status;
    }
    room
  }
}

/// The denormalized room fields copied onto reservations and invoices at
/// transition time. A frozen copy, never a live reference: later edits to
/// the room do not retroactively change issued paperwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
  pub number:    String,
  pub room_type: RoomType,
}

impl RoomSnapshot {
  pub fn of(room: &Room) -> Self {
    Self { number: room.number.clone(), room_type: room.room_type }
  }
}
