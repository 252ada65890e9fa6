//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`, money as the decimal's own text form, amenity lists as
//! compact JSON, and UUIDs as hyphenated lowercase strings.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, Utc};
use innkeep_core::{
  invoice::{Invoice, InvoiceStatus},
  reservation::{Guest, Reservation, ReservationStatus},
  room::{Room, RoomSnapshot, RoomStatus, RoomType},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> {
  Decimal::from_str(s).map_err(|e| Error::Decode(format!("decimal {s:?}: {e}")))
}

// ─── RoomType ────────────────────────────────────────────────────────────────

pub fn encode_room_type(t: RoomType) -> &'static str {
  match t {
    RoomType::Standard => "standard",
    RoomType::Deluxe => "deluxe",
    RoomType::Suite => "suite",
    RoomType::Penthouse => "penthouse",
  }
}

pub fn decode_room_type(s: &str) -> Result<RoomType> {
  match s {
    "standard" => Ok(RoomType::Standard),
    "deluxe" => Ok(RoomType::Deluxe),
    "suite" => Ok(RoomType::Suite),
    "penthouse" => Ok(RoomType::Penthouse),
    other => Err(Error::Decode(format!("unknown room type: {other:?}"))),
  }
}

// ─── RoomStatus ──────────────────────────────────────────────────────────────

pub fn encode_room_status(s: RoomStatus) -> &'static str {
  match s {
    RoomStatus::Available => "available",
    RoomStatus::Occupied => "occupied",
    RoomStatus::Cleaning => "cleaning",
    RoomStatus::Maintenance => "maintenance",
  }
}

pub fn decode_room_status(s: &str) -> Result<RoomStatus> {
  match s {
    "available" => Ok(RoomStatus::Available),
    "occupied" => Ok(RoomStatus::Occupied),
    "cleaning" => Ok(RoomStatus::Cleaning),
    "maintenance" => Ok(RoomStatus::Maintenance),
    other => Err(Error::Decode(format!("unknown room status: {other:?}"))),
  }
}

// ─── ReservationStatus ───────────────────────────────────────────────────────

pub fn encode_reservation_status(s: ReservationStatus) -> &'static str {
  match s {
    ReservationStatus::Confirmed => "confirmed",
    ReservationStatus::CheckedIn => "checked_in",
    ReservationStatus::CheckedOut => "checked_out",
    ReservationStatus::Cancelled => "cancelled",
  }
}

pub fn decode_reservation_status(s: &str) -> Result<ReservationStatus> {
  match s {
    "confirmed" => Ok(ReservationStatus::Confirmed),
    "checked_in" => Ok(ReservationStatus::CheckedIn),
    "checked_out" => Ok(ReservationStatus::CheckedOut),
    "cancelled" => Ok(ReservationStatus::Cancelled),
    other => {
      Err(Error::Decode(format!("unknown reservation status: {other:?}")))
    }
  }
}

// ─── InvoiceStatus ───────────────────────────────────────────────────────────

pub fn encode_invoice_status(s: InvoiceStatus) -> &'static str {
  match s {
    InvoiceStatus::Unpaid => "unpaid",
    InvoiceStatus::Paid => "paid",
  }
}

pub fn decode_invoice_status(s: &str) -> Result<InvoiceStatus> {
  match s {
    "unpaid" => Ok(InvoiceStatus::Unpaid),
    "paid" => Ok(InvoiceStatus::Paid),
    other => Err(Error::Decode(format!("unknown invoice status: {other:?}"))),
  }
}

// ─── Amenities ───────────────────────────────────────────────────────────────

pub fn encode_amenities(amenities: &[String]) -> Result<String> {
  Ok(serde_json::to_string(amenities)?)
}

pub fn decode_amenities(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

fn decode_i32(v: i64, column: &str) -> Result<i32> {
  i32::try_from(v).map_err(|_| Error::Decode(format!("{column} out of range: {v}")))
}

fn decode_u32(v: i64, column: &str) -> Result<u32> {
  u32::try_from(v).map_err(|_| Error::Decode(format!("{column} out of range: {v}")))
}

/// Column values of a `rooms` row, in both directions.
pub struct RawRoom {
  pub room_id:      String,
  pub number:       String,
  pub room_type:    String,
  pub floor:        i64,
  pub capacity:     i64,
  pub nightly_rate: String,
  pub amenities:    String,
  pub status:       String,
  pub created_at:   String,
}

impl RawRoom {
  pub fn encode(room: &Room) -> Result<Self> {
    Ok(Self {
      room_id:      encode_uuid(room.room_id),
      number:       room.number.clone(),
      room_type:    encode_room_type(room.room_type).to_owned(),
      floor:        i64::from(room.floor),
      capacity:     i64::from(room.capacity),
      nightly_rate: encode_decimal(room.nightly_rate),
      amenities:    encode_amenities(&room.amenities)?,
      status:       encode_room_status(room.status).to_owned(),
      created_at:   encode_dt(room.created_at),
    })
  }

  pub fn into_room(self) -> Result<Room> {
    Ok(Room {
      room_id:      decode_uuid(&self.room_id)?,
      number:       self.number,
      room_type:    decode_room_type(&self.room_type)?,
      floor:        decode_i32(self.floor, "floor")?,
      capacity:     decode_u32(self.capacity, "capacity")?,
      nightly_rate: decode_decimal(&self.nightly_rate)?,
      amenities:    decode_amenities(&self.amenities)?,
      status:       decode_room_status(&self.status)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Column values of a `reservations` row, in both directions.
pub struct RawReservation {
  pub reservation_id: String,
  pub guest_name:     String,
  pub guest_email:    Option<String>,
  pub guest_phone:    Option<String>,
  pub room_id:        String,
  pub room_number:    String,
  pub room_type:      String,
  pub check_in:       String,
  pub check_out:      String,
  pub guest_count:    i64,
  pub total_amount:   String,
  pub notes:          String,
  pub status:         String,
  pub created_at:     String,
}

impl RawReservation {
  pub fn encode(r: &Reservation) -> Self {
    Self {
      reservation_id: encode_uuid(r.reservation_id),
      guest_name:     r.guest.name.clone(),
      guest_email:    r.guest.email.clone(),
      guest_phone:    r.guest.phone.clone(),
      room_id:        encode_uuid(r.room_id),
      room_number:    r.room.number.clone(),
      room_type:      encode_room_type(r.room.room_type).to_owned(),
      check_in:       encode_date(r.check_in),
      check_out:      encode_date(r.check_out),
      guest_count:    i64::from(r.guest_count),
      total_amount:   encode_decimal(r.total_amount),
      notes:          r.notes.clone(),
      status:         encode_reservation_status(r.status).to_owned(),
      created_at:     encode_dt(r.created_at),
    }
  }

  pub fn into_reservation(self) -> Result<Reservation> {
    Ok(Reservation {
      reservation_id: decode_uuid(&self.reservation_id)?,
      guest:          Guest {
        name:  self.guest_name,
        email: self.guest_email,
        phone: self.guest_phone,
      },
      room_id:        decode_uuid(&self.room_id)?,
      room:           RoomSnapshot {
        number:    self.room_number,
        room_type: decode_room_type(&self.room_type)?,
      },
      check_in:       decode_date(&self.check_in)?,
      check_out:      decode_date(&self.check_out)?,
      guest_count:    decode_u32(self.guest_count, "guest_count")?,
      total_amount:   decode_decimal(&self.total_amount)?,
      notes:          self.notes,
      status:         decode_reservation_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Column values of an `invoices` row, in both directions.
pub struct RawInvoice {
  pub invoice_id:     String,
  pub reservation_id: String,
  pub guest_name:     String,
  pub guest_email:    Option<String>,
  pub guest_phone:    Option<String>,
  pub room_number:    String,
  pub room_type:      String,
  pub check_in:       String,
  pub check_out:      String,
  pub stay_amount:    String,
  pub amount_due:     String,
  pub amount_paid:    String,
  pub status:         String,
  pub invoice_date:   String,
  pub due_date:       String,
  pub payment_date:   Option<String>,
}

impl RawInvoice {
  pub fn encode(i: &Invoice) -> Self {
    Self {
      invoice_id:     encode_uuid(i.invoice_id),
      reservation_id: encode_uuid(i.reservation_id),
      guest_name:     i.guest.name.clone(),
      guest_email:    i.guest.email.clone(),
      guest_phone:    i.guest.phone.clone(),
      room_number:    i.room.number.clone(),
      room_type:      encode_room_type(i.room.room_type).to_owned(),
      check_in:       encode_date(i.check_in),
      check_out:      encode_date(i.check_out),
      stay_amount:    encode_decimal(i.stay_amount),
      amount_due:     encode_decimal(i.amount_due),
      amount_paid:    encode_decimal(i.amount_paid),
      status:         encode_invoice_status(i.status).to_owned(),
      invoice_date:   encode_dt(i.invoice_date),
      due_date:       encode_dt(i.due_date),
      payment_date:   i.payment_date.map(encode_dt),
    }
  }

  pub fn into_invoice(self) -> Result<Invoice> {
    Ok(Invoice {
      invoice_id:     decode_uuid(&self.invoice_id)?,
      reservation_id: decode_uuid(&self.reservation_id)?,
      guest:          Guest {
        name:  self.guest_name,
        email: self.guest_email,
        phone: self.guest_phone,
      },
      room:           RoomSnapshot {
        number:    self.room_number,
        room_type: decode_room_type(&self.room_type)?,
      },
      check_in:       decode_date(&self.check_in)?,
      check_out:      decode_date(&self.check_out)?,
      stay_amount:    decode_decimal(&self.stay_amount)?,
      amount_due:     decode_decimal(&self.amount_due)?,
      amount_paid:    decode_decimal(&self.amount_paid)?,
      status:         decode_invoice_status(&self.status)?,
      invoice_date:   decode_dt(&self.invoice_date)?,
      due_date:       decode_dt(&self.due_date)?,
      payment_date:   self.payment_date.as_deref().map(decode_dt).transpose()?,
    })
  }
}
