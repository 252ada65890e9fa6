//! [`FrontDesk`] — the reservation lifecycle controller.
//!
//! Every status change for rooms, reservations, and invoices funnels through
//! this one interface, so the cross-entity invariants are enforced in a
//! single place instead of being re-implemented per screen. Each transition
//! re-reads and re-validates the current status before mutating anything, and
//! expresses its writes as one atomic [`WriteBatch`].

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  invoice::{Invoice, InvoiceStatus},
  pricing,
  reservation::{
    AmendBooking, BookingRequest, Reservation, ReservationStatus,
  },
  room::{NewRoom, Room, RoomPatch, RoomSnapshot, RoomStatus},
  store::{PropertyStore, WriteBatch},
};

/// The outcome of a check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckIn {
  pub reservation: Reservation,
  pub invoice:     Invoice,
  /// `true` if an invoice already existed for this reservation and was
  /// reused — the idempotent short-circuit for duplicate check-in attempts.
  pub invoice_reused: bool,
}

/// The reservation lifecycle controller, generic over the storage backend.
pub struct FrontDesk<S> {
  store: S,
}

impl<S: PropertyStore> FrontDesk<S> {
  pub const fn new(store: S) -> Self { Self { store } }

  // ── Lookups ───────────────────────────────────────────────────────────

  async fn require_room(&self, id: Uuid) -> Result<Room> {
    self
      .store
      .get_room(id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::RoomNotFound(id))
  }

  async fn require_reservation(&self, id: Uuid) -> Result<Reservation> {
    self
      .store
      .get_reservation(id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::ReservationNotFound(id))
  }

  fn require_status(
    reservation: &Reservation,
    expected: ReservationStatus,
    action: &'static str,
  ) -> Result<()> {
    if reservation.status != expected {
      return Err(Error::IneligibleStatus {
        id:     reservation.reservation_id,
        status: reservation.status,
        action,
      });
    }
    Ok(())
  }

  // ── Room registry ─────────────────────────────────────────────────────

  pub async fn add_room(&self, input: NewRoom) -> Result<Room> {
    self.store.add_room(input).await.map_err(Error::storage)
  }

  pub async fn room(&self, id: Uuid) -> Result<Option<Room>> {
    self.store.get_room(id).await.map_err(Error::storage)
  }

  pub async fn rooms(&self, status: Option<RoomStatus>) -> Result<Vec<Room>> {
    self.store.list_rooms(status).await.map_err(Error::storage)
  }

  pub async fn update_room(&self, id: Uuid, patch: RoomPatch) -> Result<Room> {
    self
      .store
      .update_room(id, patch)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::RoomNotFound(id))
  }

  /// Direct housekeeping/staff override of a room's status, outside any
  /// reservation transition (e.g. Cleaning → Available, or → Maintenance).
  pub async fn override_room_status(
    &self,
    id: Uuid,
    status: RoomStatus,
  ) -> Result<Room> {
    self.update_room(id, RoomPatch::status_only(status)).await
  }

  // ── Booking ───────────────────────────────────────────────────────────

  /// Create a `Confirmed` reservation and occupy its room.
  ///
  /// The total is priced from the room's current nightly rate; the room
  /// number and type are frozen onto the reservation as a snapshot.
  pub async fn book(&self, request: BookingRequest) -> Result<Reservation> {
    if request.guest.name.trim().is_empty() {
      return Err(Error::MissingGuestName);
    }

    let room = self.require_room(request.room_id).await?;
    let total =
      pricing::stay_total(room.nightly_rate, request.check_in, request.check_out);

    let reservation = Reservation {
      reservation_id: Uuid::new_v4(),
      guest:          request.guest,
      room_id:        room.room_id,
      room:           RoomSnapshot::of(&room),
      check_in:       request.check_in,
      check_out:      request.check_out,
      guest_count:    request.guest_count,
      total_amount:   total,
      notes:          String::new(),
      status:         ReservationStatus::Confirmed,
      created_at:     Utc::now(),
    };

    let batch = WriteBatch::new()
      .put_reservation(reservation.clone())
      .set_room_status(room.room_id, RoomStatus::Occupied);
    self.store.apply(batch).await.map_err(Error::storage)?;

    Ok(reservation)
  }

  /// Change the room, dates, or party size of a still-`Confirmed` booking.
  /// The total is recomputed; a room change releases the old room and
  /// re-freezes the snapshot from the new one.
  pub async fn amend_booking(
    &self,
    id: Uuid,
    amend: AmendBooking,
  ) -> Result<Reservation> {
    let mut reservation = self.require_reservation(id).await?;
    Self::require_status(&reservation, ReservationStatus::Confirmed, "amend")?;

    let target_room_id = amend.room_id.unwrap_or(reservation.room_id);
    let room_changed = target_room_id != reservation.room_id;
    let room = self.require_room(target_room_id).await?;

    let previous_room_id = reservation.room_id;
    reservation.room_id = room.room_id;
    reservation.room = RoomSnapshot::of(&room);
    if let Some(check_in) = amend.check_in {
      reservation.check_in = check_in;
    }
    if let Some(check_out) = amend.check_out {
      reservation.check_out = check_out;
    }
    if let Some(guest_count) = amend.guest_count {
      reservation.guest_count = guest_count;
    }
    reservation.total_amount = pricing::stay_total(
      room.nightly_rate,
      reservation.check_in,
      reservation.check_out,
    );

    let mut batch = WriteBatch::new();
    if room_changed {
      batch = batch
        .set_room_status(previous_room_id, RoomStatus::Available)
        .set_room_status(room.room_id, RoomStatus::Occupied);
    }
    let batch = batch.put_reservation(reservation.clone());
    self.store.apply(batch).await.map_err(Error::storage)?;

    Ok(reservation)
  }

  // ── Lifecycle transitions ─────────────────────────────────────────────

  /// Confirmed → CheckedIn. Issues the stay's invoice unless one already
  /// exists; the reservation, room, and invoice writes land in one batch.
  pub async fn check_in(&self, id: Uuid) -> Result<CheckIn> {
    let mut reservation = self.require_reservation(id).await?;
    Self::require_status(&reservation, ReservationStatus::Confirmed, "check in")?;

    // Existing-invoice lookup first: a retry after a partial failure (or a
    // concurrent duplicate attempt) must not issue a second invoice.
    let existing = self
      .store
      .invoice_for_reservation(id)
      .await
      .map_err(Error::storage)?;

    reservation.status = ReservationStatus::CheckedIn;

    let mut batch = WriteBatch::new()
      .put_reservation(reservation.clone())
      .set_room_status(reservation.room_id, RoomStatus::Occupied);

    let (invoice, invoice_reused) = match existing {
      Some(invoice) => (invoice, true),
      None => {
        let invoice = Invoice::issue(&reservation, Utc::now());
        batch = batch.put_invoice(invoice.clone());
        (invoice, false)
      }
    };

    self.store.apply(batch).await.map_err(Error::storage)?;

    Ok(CheckIn { reservation, invoice, invoice_reused })
  }

  /// CheckedIn → CheckedOut. The room goes to Cleaning (never directly
  /// Available — it must pass through housekeeping before rebooking), and
  /// an unpaid invoice picks up any service charges posted during the stay.
  pub async fn check_out(&self, id: Uuid) -> Result<Reservation> {
    let mut reservation = self.require_reservation(id).await?;
    Self::require_status(&reservation, ReservationStatus::CheckedIn, "check out")?;

    reservation.status = ReservationStatus::CheckedOut;

    let mut batch = WriteBatch::new()
      .put_reservation(reservation.clone())
      .set_room_status(reservation.room_id, RoomStatus::Cleaning);

    if let Some(mut invoice) = self
      .store
      .invoice_for_reservation(id)
      .await
      .map_err(Error::storage)?
      && invoice.status == InvoiceStatus::Unpaid
      && invoice.amount_due != reservation.total_amount
    {
      invoice.amount_due = reservation.total_amount;
      batch = batch.put_invoice(invoice);
    }

    self.store.apply(batch).await.map_err(Error::storage)?;

    Ok(reservation)
  }

  /// Confirmed → Cancelled. The room was never occupied, so it returns
  /// straight to Available with no cleaning step.
  pub async fn cancel(&self, id: Uuid) -> Result<Reservation> {
    let mut reservation = self.require_reservation(id).await?;
    Self::require_status(&reservation, ReservationStatus::Confirmed, "cancel")?;

    reservation.status = ReservationStatus::Cancelled;

    let batch = WriteBatch::new()
      .put_reservation(reservation.clone())
      .set_room_status(reservation.room_id, RoomStatus::Available);
    self.store.apply(batch).await.map_err(Error::storage)?;

    Ok(reservation)
  }

  // ── Billing ───────────────────────────────────────────────────────────

  /// Post an incidental service charge (restaurant, laundry, …) against an
  /// active stay: the amount is added to the running total and a
  /// timestamped line is appended to the reservation's notes.
  pub async fn post_charge(
    &self,
    id: Uuid,
    description: &str,
    amount: Decimal,
  ) -> Result<Reservation> {
    if amount <= Decimal::ZERO {
      return Err(Error::NonPositiveCharge(amount));
    }

    let mut reservation = self.require_reservation(id).await?;
    Self::require_status(
      &reservation,
      ReservationStatus::CheckedIn,
      "post a charge",
    )?;

    reservation.total_amount += amount;
    if !reservation.notes.is_empty() {
      reservation.notes.push('\n');
    }
    reservation.notes.push_str(&format!(
      "[{}] {description}: +{amount}",
      Utc::now().format("%Y-%m-%d %H:%M UTC"),
    ));

    let batch = WriteBatch::new().put_reservation(reservation.clone());
    self.store.apply(batch).await.map_err(Error::storage)?;

    Ok(reservation)
  }

  /// Mark an invoice fully paid: amount paid = amount due, payment date =
  /// now. Re-settling an already-paid invoice is a no-op that keeps the
  /// original payment date.
  pub async fn settle_invoice(&self, invoice_id: Uuid) -> Result<Invoice> {
    let mut invoice = self
      .store
      .get_invoice(invoice_id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::InvoiceNotFound(invoice_id))?;

    invoice.amount_paid = invoice.amount_due;
    invoice.status = InvoiceStatus::Paid;
    if invoice.payment_date.is_none() {
      invoice.payment_date = Some(Utc::now());
    }

    let batch = WriteBatch::new().put_invoice(invoice.clone());
    self.store.apply(batch).await.map_err(Error::storage)?;

    Ok(invoice)
  }

  // ── Removal ───────────────────────────────────────────────────────────

  /// Staff purge of a single reservation. If it is still holding its room
  /// (Confirmed or CheckedIn), the room is released to Available in the
  /// same batch; terminal reservations already released theirs.
  pub async fn delete_reservation(&self, id: Uuid) -> Result<()> {
    let reservation = self.require_reservation(id).await?;

    let mut batch = WriteBatch::new();
    if reservation.status.holds_room() {
      batch = batch.set_room_status(reservation.room_id, RoomStatus::Available);
    }
    let batch = batch.delete_reservation(id);
    self.store.apply(batch).await.map_err(Error::storage)?;

    Ok(())
  }

  /// Bulk-delete every invoice; financial history is decoupled from stay
  /// history, so reservations are untouched.
  pub async fn purge_invoices(&self) -> Result<u64> {
    self.store.purge_invoices().await.map_err(Error::storage)
  }

  pub async fn delete_invoice(&self, id: Uuid) -> Result<()> {
    let removed = self
      .store
      .delete_invoice(id)
      .await
      .map_err(Error::storage)?;
    if !removed {
      return Err(Error::InvoiceNotFound(id));
    }
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn reservation(&self, id: Uuid) -> Result<Option<Reservation>> {
    self.store.get_reservation(id).await.map_err(Error::storage)
  }

  pub async fn reservations(
    &self,
    status: Option<ReservationStatus>,
  ) -> Result<Vec<Reservation>> {
    self
      .store
      .list_reservations(status)
      .await
      .map_err(Error::storage)
  }

  pub async fn invoice(&self, id: Uuid) -> Result<Option<Invoice>> {
    self.store.get_invoice(id).await.map_err(Error::storage)
  }

  pub async fn invoice_for_reservation(
    &self,
    reservation_id: Uuid,
  ) -> Result<Option<Invoice>> {
    self
      .store
      .invoice_for_reservation(reservation_id)
      .await
      .map_err(Error::storage)
  }

  pub async fn invoices(&self) -> Result<Vec<Invoice>> {
    self.store.list_invoices().await.map_err(Error::storage)
  }
}
