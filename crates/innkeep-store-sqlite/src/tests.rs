//! Integration tests for `SqliteStore` against an in-memory database,
//! driven through the front desk so every lifecycle invariant is checked
//! end to end.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use innkeep_core::{
  ErrorKind, FrontDesk,
  invoice::{Invoice, InvoiceStatus},
  reservation::{AmendBooking, BookingRequest, Guest, ReservationStatus},
  room::{NewRoom, RoomStatus, RoomType},
  store::{PropertyStore, WriteBatch},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn desk() -> FrontDesk<SqliteStore> {
  FrontDesk::new(store().await)
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn guest(name: &str) -> Guest {
  Guest {
    name:  name.into(),
    email: Some(format!("{}@example.com", name.to_lowercase())),
    phone: None,
  }
}

fn new_room(number: &str, rate: i64) -> NewRoom {
  NewRoom {
    number:       number.into(),
    room_type:    RoomType::Standard,
    floor:        2,
    capacity:     2,
    nightly_rate: Decimal::from(rate),
    amenities:    vec!["wifi".into()],
  }
}

/// Three nights, 2024-01-01 → 2024-01-04.
fn booking(room_id: Uuid) -> BookingRequest {
  BookingRequest {
    guest: guest("Alice"),
    room_id,
    check_in: d(2024, 1, 1),
    check_out: d(2024, 1, 4),
    guest_count: 2,
  }
}

// ─── Room registry ───────────────────────────────────────────────────────────

#[tokio::test]
async fn add_room_defaults_to_available() {
  let fd = desk().await;
  let room = fd.add_room(new_room("101", 100)).await.unwrap();

  assert_eq!(room.status, RoomStatus::Available);
  assert_eq!(room.nightly_rate, Decimal::from(100));

  let fetched = fd.room(room.room_id).await.unwrap().unwrap();
  assert_eq!(fetched.number, "101");
  assert_eq!(fetched.amenities, vec!["wifi".to_string()]);
}

#[tokio::test]
async fn update_room_merges_partial_fields() {
  let fd = desk().await;
  let room = fd.add_room(new_room("101", 100)).await.unwrap();

  let patch = innkeep_core::room::RoomPatch {
    nightly_rate: Some(Decimal::from(120)),
    amenities: Some(vec!["wifi".into(), "minibar".into()]),
    ..Default::default()
  };
  let updated = fd.update_room(room.room_id, patch).await.unwrap();

  assert_eq!(updated.nightly_rate, Decimal::from(120));
  assert_eq!(updated.amenities.len(), 2);
  // Untouched fields survive the merge.
  assert_eq!(updated.number, "101");
  assert_eq!(updated.floor, 2);
  assert_eq!(updated.status, RoomStatus::Available);
}

#[tokio::test]
async fn update_unknown_room_is_not_found() {
  let fd = desk().await;
  let err = fd
    .update_room(Uuid::new_v4(), Default::default())
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_rooms_filtered_by_status() {
  let fd = desk().await;
  let a = fd.add_room(new_room("101", 100)).await.unwrap();
  fd.add_room(new_room("102", 100)).await.unwrap();

  fd.book(booking(a.room_id)).await.unwrap();

  let available = fd.rooms(Some(RoomStatus::Available)).await.unwrap();
  assert_eq!(available.len(), 1);
  assert_eq!(available[0].number, "102");

  let all = fd.rooms(None).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn housekeeping_override_returns_cleaned_room_to_service() {
  let fd = desk().await;
  let room = fd.add_room(new_room("101", 100)).await.unwrap();

  let res = fd.book(booking(room.room_id)).await.unwrap();
  fd.check_in(res.reservation_id).await.unwrap();
  fd.check_out(res.reservation_id).await.unwrap();
  assert_eq!(
    fd.room(room.room_id).await.unwrap().unwrap().status,
    RoomStatus::Cleaning
  );

  fd.override_room_status(room.room_id, RoomStatus::Available)
    .await
    .unwrap();
  assert_eq!(
    fd.room(room.room_id).await.unwrap().unwrap().status,
    RoomStatus::Available
  );
}

// ─── Booking ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn book_occupies_room_and_prices_stay() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();

  let res = fd.book(booking(room.room_id)).await.unwrap();

  assert_eq!(res.status, ReservationStatus::Confirmed);
  assert_eq!(res.total_amount, Decimal::from(300)); // 3 nights × 100
  assert_eq!(res.room.number, "204");
  assert_eq!(res.room.room_type, RoomType::Standard);

  let room = fd.room(room.room_id).await.unwrap().unwrap();
  assert_eq!(room.status, RoomStatus::Occupied);
}

#[tokio::test]
async fn book_without_guest_name_is_rejected() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();

  let mut request = booking(room.room_id);
  request.guest.name = "   ".into();

  let err = fd.book(request).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  // Nothing was written: the room is still bookable.
  let room = fd.room(room.room_id).await.unwrap().unwrap();
  assert_eq!(room.status, RoomStatus::Available);
}

#[tokio::test]
async fn book_unknown_room_is_not_found() {
  let fd = desk().await;
  let err = fd.book(booking(Uuid::new_v4())).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn incomplete_date_range_prices_to_zero() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();

  let mut request = booking(room.room_id);
  request.check_out = request.check_in;

  let res = fd.book(request).await.unwrap();
  assert_eq!(res.total_amount, Decimal::ZERO);
}

// ─── Amendment ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn amend_booking_reprices_and_moves_room() {
  let fd = desk().await;
  let economy = fd.add_room(new_room("101", 100)).await.unwrap();
  let suite = fd
    .add_room(NewRoom {
      room_type: RoomType::Suite,
      ..new_room("501", 200)
    })
    .await
    .unwrap();

  let res = fd.book(booking(economy.room_id)).await.unwrap();
  assert_eq!(res.total_amount, Decimal::from(300));

  let amended = fd
    .amend_booking(res.reservation_id, AmendBooking {
      room_id: Some(suite.room_id),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(amended.total_amount, Decimal::from(600)); // 3 nights × 200
  assert_eq!(amended.room.number, "501");
  assert_eq!(amended.room.room_type, RoomType::Suite);

  // The old room is released, the new one held.
  assert_eq!(
    fd.room(economy.room_id).await.unwrap().unwrap().status,
    RoomStatus::Available
  );
  assert_eq!(
    fd.room(suite.room_id).await.unwrap().unwrap().status,
    RoomStatus::Occupied
  );
}

#[tokio::test]
async fn amend_dates_recomputes_total() {
  let fd = desk().await;
  let room = fd.add_room(new_room("101", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();

  let amended = fd
    .amend_booking(res.reservation_id, AmendBooking {
      check_out: Some(d(2024, 1, 6)),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(amended.total_amount, Decimal::from(500)); // 5 nights × 100
}

#[tokio::test]
async fn amend_after_check_in_is_conflict() {
  let fd = desk().await;
  let room = fd.add_room(new_room("101", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  fd.check_in(res.reservation_id).await.unwrap();

  let err = fd
    .amend_booking(res.reservation_id, Default::default())
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

// ─── Check-in ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_in_issues_exactly_one_invoice() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();

  let outcome = fd.check_in(res.reservation_id).await.unwrap();

  assert!(!outcome.invoice_reused);
  assert_eq!(outcome.reservation.status, ReservationStatus::CheckedIn);

  let invoice = &outcome.invoice;
  assert_eq!(invoice.reservation_id, res.reservation_id);
  assert_eq!(invoice.stay_amount, Decimal::from(300));
  assert_eq!(invoice.amount_due, Decimal::from(300));
  assert_eq!(invoice.amount_paid, Decimal::ZERO);
  assert_eq!(invoice.status, InvoiceStatus::Unpaid);
  assert_eq!(
    invoice.due_date - invoice.invoice_date,
    chrono::Duration::hours(24)
  );
  assert_eq!(invoice.guest.name, "Alice");
  assert_eq!(invoice.room.number, "204");

  assert_eq!(fd.invoices().await.unwrap().len(), 1);
}

#[tokio::test]
async fn second_check_in_is_conflict_and_no_second_invoice() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();

  fd.check_in(res.reservation_id).await.unwrap();
  let err = fd.check_in(res.reservation_id).await.unwrap_err();

  assert_eq!(err.kind(), ErrorKind::Conflict);
  assert_eq!(fd.invoices().await.unwrap().len(), 1);
}

#[tokio::test]
async fn check_in_retry_after_partial_failure_reuses_invoice() {
  let s = store().await;
  let fd = FrontDesk::new(s.clone());
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();

  let first = fd.check_in(res.reservation_id).await.unwrap();

  // Simulate a stale client re-driving the transition after the status
  // write was lost: reservation back to Confirmed, invoice still issued.
  let mut stale = first.reservation.clone();
  stale.status = ReservationStatus::Confirmed;
  s.apply(WriteBatch::new().put_reservation(stale)).await.unwrap();

  let second = fd.check_in(res.reservation_id).await.unwrap();
  assert!(second.invoice_reused);
  assert_eq!(second.invoice.invoice_id, first.invoice.invoice_id);
  assert_eq!(fd.invoices().await.unwrap().len(), 1);
}

#[tokio::test]
async fn check_in_unknown_reservation_is_not_found() {
  let fd = desk().await;
  let err = fd.check_in(Uuid::new_v4()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Check-out ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_out_sends_room_to_cleaning_never_available() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  fd.check_in(res.reservation_id).await.unwrap();

  let done = fd.check_out(res.reservation_id).await.unwrap();
  assert_eq!(done.status, ReservationStatus::CheckedOut);

  let room = fd.room(room.room_id).await.unwrap().unwrap();
  assert_eq!(room.status, RoomStatus::Cleaning);
}

#[tokio::test]
async fn check_out_before_check_in_is_conflict() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();

  let err = fd.check_out(res.reservation_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn check_out_folds_posted_charges_into_invoice() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  fd.check_in(res.reservation_id).await.unwrap();

  fd.post_charge(res.reservation_id, "Restaurant", Decimal::from(42))
    .await
    .unwrap();
  fd.post_charge(res.reservation_id, "Laundry", Decimal::from(15))
    .await
    .unwrap();

  fd.check_out(res.reservation_id).await.unwrap();

  let invoice = fd
    .invoice_for_reservation(res.reservation_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(invoice.amount_due, Decimal::from(357)); // 300 + 42 + 15
  assert_eq!(invoice.stay_amount, Decimal::from(300)); // frozen at check-in
  assert_eq!(invoice.status, InvoiceStatus::Unpaid);
}

// ─── Cancellation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn cancel_releases_room_straight_to_available() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();

  let cancelled = fd.cancel(res.reservation_id).await.unwrap();
  assert_eq!(cancelled.status, ReservationStatus::Cancelled);

  // Never occupied, so no cleaning step.
  let room = fd.room(room.room_id).await.unwrap().unwrap();
  assert_eq!(room.status, RoomStatus::Available);
}

#[tokio::test]
async fn cancel_after_check_in_is_conflict() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  fd.check_in(res.reservation_id).await.unwrap();

  let err = fd.cancel(res.reservation_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  // Terminal states are never left either.
  fd.check_out(res.reservation_id).await.unwrap();
  let err = fd.cancel(res.reservation_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

// ─── Service charges ─────────────────────────────────────────────────────────

#[tokio::test]
async fn post_charge_adds_to_total_and_logs_note() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  fd.check_in(res.reservation_id).await.unwrap();

  let updated = fd
    .post_charge(res.reservation_id, "Minibar", Decimal::new(1250, 2))
    .await
    .unwrap();

  assert_eq!(updated.total_amount, Decimal::new(31250, 2)); // 300 + 12.50
  assert!(updated.notes.contains("Minibar"));
  assert!(updated.notes.contains("12.50"));

  let again = fd
    .post_charge(res.reservation_id, "Spa", Decimal::from(30))
    .await
    .unwrap();
  assert_eq!(again.notes.lines().count(), 2);
}

#[tokio::test]
async fn post_charge_requires_checked_in() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();

  let err = fd
    .post_charge(res.reservation_id, "Minibar", Decimal::from(10))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn post_charge_rejects_non_positive_amounts() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  fd.check_in(res.reservation_id).await.unwrap();

  for amount in [Decimal::ZERO, Decimal::from(-5)] {
    let err = fd
      .post_charge(res.reservation_id, "Bogus", amount)
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
  }
}

// ─── Settlement ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn settle_invoice_pays_in_full() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  let outcome = fd.check_in(res.reservation_id).await.unwrap();

  let settled = fd.settle_invoice(outcome.invoice.invoice_id).await.unwrap();

  assert_eq!(settled.status, InvoiceStatus::Paid);
  assert_eq!(settled.amount_paid, settled.amount_due);
  assert!(settled.payment_date.is_some());
}

#[tokio::test]
async fn settle_twice_keeps_original_payment_date() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  let outcome = fd.check_in(res.reservation_id).await.unwrap();

  let first = fd.settle_invoice(outcome.invoice.invoice_id).await.unwrap();
  let second = fd.settle_invoice(outcome.invoice.invoice_id).await.unwrap();

  assert_eq!(second.payment_date, first.payment_date);
  assert_eq!(second.amount_paid, second.amount_due);
}

#[tokio::test]
async fn settle_unknown_invoice_is_not_found() {
  let fd = desk().await;
  let err = fd.settle_invoice(Uuid::new_v4()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Deletion & purge ────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_confirmed_reservation_releases_room() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();

  fd.delete_reservation(res.reservation_id).await.unwrap();

  assert!(fd.reservation(res.reservation_id).await.unwrap().is_none());
  assert_eq!(
    fd.room(room.room_id).await.unwrap().unwrap().status,
    RoomStatus::Available
  );
}

#[tokio::test]
async fn delete_checked_out_reservation_leaves_room_untouched() {
  let fd = desk().await;
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  fd.check_in(res.reservation_id).await.unwrap();
  fd.check_out(res.reservation_id).await.unwrap();

  fd.delete_reservation(res.reservation_id).await.unwrap();

  assert!(fd.reservation(res.reservation_id).await.unwrap().is_none());
  // The check-out transition already released the room to Cleaning.
  assert_eq!(
    fd.room(room.room_id).await.unwrap().unwrap().status,
    RoomStatus::Cleaning
  );
}

#[tokio::test]
async fn purge_invoices_leaves_stay_history_alone() {
  let fd = desk().await;
  let a = fd.add_room(new_room("101", 100)).await.unwrap();
  let b = fd.add_room(new_room("102", 100)).await.unwrap();

  let res_a = fd.book(booking(a.room_id)).await.unwrap();
  let mut request = booking(b.room_id);
  request.guest = guest("Bob");
  let res_b = fd.book(request).await.unwrap();

  fd.check_in(res_a.reservation_id).await.unwrap();
  fd.check_in(res_b.reservation_id).await.unwrap();

  let purged = fd.purge_invoices().await.unwrap();
  assert_eq!(purged, 2);
  assert!(fd.invoices().await.unwrap().is_empty());

  // Reservations are untouched by the purge.
  assert_eq!(
    fd.reservations(Some(ReservationStatus::CheckedIn))
      .await
      .unwrap()
      .len(),
    2
  );
}

#[tokio::test]
async fn delete_single_invoice() {
  let fd = desk().await;
  let room = fd.add_room(new_room("101", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  let outcome = fd.check_in(res.reservation_id).await.unwrap();

  fd.delete_invoice(outcome.invoice.invoice_id).await.unwrap();
  assert!(fd.invoices().await.unwrap().is_empty());

  let err = fd
    .delete_invoice(outcome.invoice.invoice_id)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Atomicity ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_invoice_for_same_stay_is_rejected_by_the_store() {
  let s = store().await;
  let fd = FrontDesk::new(s.clone());
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  let outcome = fd.check_in(res.reservation_id).await.unwrap();

  // A fresh invoice id against the same reservation trips the UNIQUE
  // constraint even if the front desk's lookup were bypassed.
  let duplicate = Invoice {
    invoice_id: Uuid::new_v4(),
    ..outcome.invoice.clone()
  };
  let err = s
    .apply(WriteBatch::new().put_invoice(duplicate))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));
  assert_eq!(fd.invoices().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_batch_applies_nothing() {
  let s = store().await;
  let fd = FrontDesk::new(s.clone());
  let room = fd.add_room(new_room("204", 100)).await.unwrap();
  let res = fd.book(booking(room.room_id)).await.unwrap();
  let outcome = fd.check_in(res.reservation_id).await.unwrap();

  // Batch: a room status flip followed by a write that violates the
  // one-invoice-per-stay constraint. The whole batch must roll back.
  let duplicate = Invoice {
    invoice_id: Uuid::new_v4(),
    ..outcome.invoice.clone()
  };
  let batch = WriteBatch::new()
    .set_room_status(room.room_id, RoomStatus::Maintenance)
    .put_invoice(duplicate);

  s.apply(batch).await.unwrap_err();

  let room = fd.room(room.room_id).await.unwrap().unwrap();
  assert_eq!(room.status, RoomStatus::Occupied);
}
