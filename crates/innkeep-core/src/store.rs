//! The `PropertyStore` trait and the atomic write batch.
//!
//! The trait is implemented by storage backends (e.g.
//! `innkeep-store-sqlite`). The front desk and the API layer depend on this
//! abstraction, not on any concrete backend, so tests can substitute an
//! in-memory database.

use std::future::Future;

use uuid::Uuid;

use crate::{
  invoice::Invoice,
  reservation::{Reservation, ReservationStatus},
  room::{NewRoom, Room, RoomPatch, RoomStatus},
};

// ─── Write batch ─────────────────────────────────────────────────────────────

/// One record-level write. Batched so multi-entity transitions (check-in in
/// particular) land all-or-nothing; a room stuck Occupied with no invoice is
/// the failure mode this exists to prevent.
#[derive(Debug, Clone)]
pub enum Write {
  PutReservation(Reservation),
  DeleteReservation(Uuid),
  SetRoomStatus { room_id: Uuid, status: RoomStatus },
  PutInvoice(Invoice),
}

/// An ordered set of writes applied as one logical unit.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
  pub writes: Vec<Write>,
}

impl WriteBatch {
  pub fn new() -> Self { Self::default() }

  pub fn put_reservation(mut self, reservation: Reservation) -> Self {
    self.writes.push(Write::PutReservation(reservation));
    self
  }

  pub fn delete_reservation(mut self, reservation_id: Uuid) -> Self {
    self.writes.push(Write::DeleteReservation(reservation_id));
    self
  }

  pub fn set_room_status(mut self, room_id: Uuid, status: RoomStatus) -> Self {
    self.writes.push(Write::SetRoomStatus { room_id, status });
    self
  }

  pub fn put_invoice(mut self, invoice: Invoice) -> Self {
    self.writes.push(Write::PutInvoice(invoice));
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an Innkeep storage backend.
///
/// Reads are plain lookups. All lifecycle mutations go through
/// [`PropertyStore::apply`], which must be atomic: either every write in the
/// batch lands, or none do.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PropertyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Rooms ─────────────────────────────────────────────────────────────

  /// Create and persist a room. The store assigns the id and creation
  /// timestamp; the initial status is `Available`.
  fn add_room(
    &self,
    input: NewRoom,
  ) -> impl Future<Output = Result<Room, Self::Error>> + Send + '_;

  /// Retrieve a room by id. Returns `None` if not found.
  fn get_room(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Room>, Self::Error>> + Send + '_;

  /// List all rooms, optionally filtered by status.
  fn list_rooms(
    &self,
    status: Option<RoomStatus>,
  ) -> impl Future<Output = Result<Vec<Room>, Self::Error>> + Send + '_;

  /// Merge a partial update into an existing room record. Returns the
  /// updated room, or `None` if the id does not resolve.
  fn update_room(
    &self,
    id: Uuid,
    patch: RoomPatch,
  ) -> impl Future<Output = Result<Option<Room>, Self::Error>> + Send + '_;

  // ── Reservations ──────────────────────────────────────────────────────

  fn get_reservation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Reservation>, Self::Error>> + Send + '_;

  /// List all reservations, optionally filtered by status.
  fn list_reservations(
    &self,
    status: Option<ReservationStatus>,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + '_;

  // ── Invoices ──────────────────────────────────────────────────────────

  fn get_invoice(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Invoice>, Self::Error>> + Send + '_;

  /// Look up the invoice for a reservation, if one has been issued.
  /// This is the idempotency guard consulted before check-in creates one.
  fn invoice_for_reservation(
    &self,
    reservation_id: Uuid,
  ) -> impl Future<Output = Result<Option<Invoice>, Self::Error>> + Send + '_;

  fn list_invoices(
    &self,
  ) -> impl Future<Output = Result<Vec<Invoice>, Self::Error>> + Send + '_;

  /// Delete one invoice. Returns `false` if the id did not resolve.
  fn delete_invoice(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Bulk-delete every invoice; returns the number removed. No cascading
  /// effect on reservations.
  fn purge_invoices(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Atomic writes ─────────────────────────────────────────────────────

  /// Apply every write in `batch` as one transaction.
  fn apply(
    &self,
    batch: WriteBatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
