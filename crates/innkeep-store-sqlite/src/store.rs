//! [`SqliteStore`] — the SQLite implementation of [`PropertyStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use innkeep_core::{
  invoice::Invoice,
  reservation::{Reservation, ReservationStatus},
  room::{NewRoom, Room, RoomPatch, RoomStatus},
  store::{PropertyStore, Write, WriteBatch},
};

use crate::{
  Error, Result,
  encode::{
    RawInvoice, RawReservation, RawRoom, encode_reservation_status,
    encode_room_status, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

const ROOM_COLUMNS: &str =
  "room_id, number, room_type, floor, capacity, nightly_rate, amenities, \
   status, created_at";

const RESERVATION_COLUMNS: &str =
  "reservation_id, guest_name, guest_email, guest_phone, room_id, \
   room_number, room_type, check_in, check_out, guest_count, total_amount, \
   notes, status, created_at";

const INVOICE_COLUMNS: &str =
  "invoice_id, reservation_id, guest_name, guest_email, guest_phone, \
   room_number, room_type, check_in, check_out, stay_amount, amount_due, \
   amount_paid, status, invoice_date, due_date, payment_date";

fn room_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRoom> {
  Ok(RawRoom {
    room_id:      row.get(0)?,
    number:       row.get(1)?,
    room_type:    row.get(2)?,
    floor:        row.get(3)?,
    capacity:     row.get(4)?,
    nightly_rate: row.get(5)?,
    amenities:    row.get(6)?,
    status:       row.get(7)?,
    created_at:   row.get(8)?,
  })
}

fn reservation_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawReservation> {
  Ok(RawReservation {
    reservation_id: row.get(0)?,
    guest_name:     row.get(1)?,
    guest_email:    row.get(2)?,
    guest_phone:    row.get(3)?,
    room_id:        row.get(4)?,
    room_number:    row.get(5)?,
    room_type:      row.get(6)?,
    check_in:       row.get(7)?,
    check_out:      row.get(8)?,
    guest_count:    row.get(9)?,
    total_amount:   row.get(10)?,
    notes:          row.get(11)?,
    status:         row.get(12)?,
    created_at:     row.get(13)?,
  })
}

fn invoice_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawInvoice> {
  Ok(RawInvoice {
    invoice_id:     row.get(0)?,
    reservation_id: row.get(1)?,
    guest_name:     row.get(2)?,
    guest_email:    row.get(3)?,
    guest_phone:    row.get(4)?,
    room_number:    row.get(5)?,
    room_type:      row.get(6)?,
    check_in:       row.get(7)?,
    check_out:      row.get(8)?,
    stay_amount:    row.get(9)?,
    amount_due:     row.get(10)?,
    amount_paid:    row.get(11)?,
    status:         row.get(12)?,
    invoice_date:   row.get(13)?,
    due_date:       row.get(14)?,
    payment_date:   row.get(15)?,
  })
}

// ─── Encoded writes ──────────────────────────────────────────────────────────

/// A [`Write`] with every value already encoded to its column form, so the
/// transaction closure contains no fallible domain conversions.
enum EncodedWrite {
  PutReservation(RawReservation),
  DeleteReservation(String),
  SetRoomStatus { room_id: String, status: String },
  PutInvoice(RawInvoice),
}

fn encode_write(write: &Write) -> EncodedWrite {
  match write {
    Write::PutReservation(r) => {
      EncodedWrite::PutReservation(RawReservation::encode(r))
    }
    Write::DeleteReservation(id) => {
      EncodedWrite::DeleteReservation(encode_uuid(*id))
    }
    Write::SetRoomStatus { room_id, status } => EncodedWrite::SetRoomStatus {
      room_id: encode_uuid(*room_id),
      status:  encode_room_status(*status).to_owned(),
    },
    Write::PutInvoice(i) => EncodedWrite::PutInvoice(RawInvoice::encode(i)),
  }
}

fn execute_write(
  tx: &rusqlite::Transaction<'_>,
  write: &EncodedWrite,
) -> rusqlite::Result<()> {
  match write {
    EncodedWrite::PutReservation(r) => {
      // Upsert keyed on the primary key only; `INSERT OR REPLACE` would
      // delete-and-reinsert, which trips foreign keys and masks genuine
      // constraint violations.
      tx.execute(
        "INSERT INTO reservations (
           reservation_id, guest_name, guest_email, guest_phone, room_id,
           room_number, room_type, check_in, check_out, guest_count,
           total_amount, notes, status, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
         ON CONFLICT(reservation_id) DO UPDATE SET
           guest_name   = excluded.guest_name,
           guest_email  = excluded.guest_email,
           guest_phone  = excluded.guest_phone,
           room_id      = excluded.room_id,
           room_number  = excluded.room_number,
           room_type    = excluded.room_type,
           check_in     = excluded.check_in,
           check_out    = excluded.check_out,
           guest_count  = excluded.guest_count,
           total_amount = excluded.total_amount,
           notes        = excluded.notes,
           status       = excluded.status,
           created_at   = excluded.created_at",
        rusqlite::params![
          r.reservation_id,
          r.guest_name,
          r.guest_email,
          r.guest_phone,
          r.room_id,
          r.room_number,
          r.room_type,
          r.check_in,
          r.check_out,
          r.guest_count,
          r.total_amount,
          r.notes,
          r.status,
          r.created_at,
        ],
      )?;
    }
    EncodedWrite::DeleteReservation(id) => {
      tx.execute(
        "DELETE FROM reservations WHERE reservation_id = ?1",
        rusqlite::params![id],
      )?;
    }
    EncodedWrite::SetRoomStatus { room_id, status } => {
      tx.execute(
        "UPDATE rooms SET status = ?2 WHERE room_id = ?1",
        rusqlite::params![room_id, status],
      )?;
    }
    EncodedWrite::PutInvoice(i) => {
      // Conflict target is the primary key alone: a second invoice id for
      // the same reservation must trip UNIQUE(reservation_id), not be
      // silently replaced.
      tx.execute(
        "INSERT INTO invoices (
           invoice_id, reservation_id, guest_name, guest_email, guest_phone,
           room_number, room_type, check_in, check_out, stay_amount,
           amount_due, amount_paid, status, invoice_date, due_date,
           payment_date
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                   ?14, ?15, ?16)
         ON CONFLICT(invoice_id) DO UPDATE SET
           reservation_id = excluded.reservation_id,
           guest_name     = excluded.guest_name,
           guest_email    = excluded.guest_email,
           guest_phone    = excluded.guest_phone,
           room_number    = excluded.room_number,
           room_type      = excluded.room_type,
           check_in       = excluded.check_in,
           check_out      = excluded.check_out,
           stay_amount    = excluded.stay_amount,
           amount_due     = excluded.amount_due,
           amount_paid    = excluded.amount_paid,
           status         = excluded.status,
           invoice_date   = excluded.invoice_date,
           due_date       = excluded.due_date,
           payment_date   = excluded.payment_date",
        rusqlite::params![
          i.invoice_id,
          i.reservation_id,
          i.guest_name,
          i.guest_email,
          i.guest_phone,
          i.room_number,
          i.room_type,
          i.check_in,
          i.check_out,
          i.stay_amount,
          i.amount_due,
          i.amount_paid,
          i.status,
          i.invoice_date,
          i.due_date,
          i.payment_date,
        ],
      )?;
    }
  }
  Ok(())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Innkeep property store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Room`] into the `rooms` table.
  async fn insert_room(&self, room: &Room) -> Result<()> {
    let raw = RawRoom::encode(room)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rooms (
             room_id, number, room_type, floor, capacity, nightly_rate,
             amenities, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
           ON CONFLICT(room_id) DO UPDATE SET
             number       = excluded.number,
             room_type    = excluded.room_type,
             floor        = excluded.floor,
             capacity     = excluded.capacity,
             nightly_rate = excluded.nightly_rate,
             amenities    = excluded.amenities,
             status       = excluded.status,
             created_at   = excluded.created_at",
          rusqlite::params![
            raw.room_id,
            raw.number,
            raw.room_type,
            raw.floor,
            raw.capacity,
            raw.nightly_rate,
            raw.amenities,
            raw.status,
            raw.created_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PropertyStore impl ──────────────────────────────────────────────────────

impl PropertyStore for SqliteStore {
  type Error = Error;

  // ── Rooms ───────────────────────────────────────────────────────────────

  async fn add_room(&self, input: NewRoom) -> Result<Room> {
    let room = Room {
      room_id:      Uuid::new_v4(),
      number:       input.number,
      room_type:    input.room_type,
      floor:        input.floor,
      capacity:     input.capacity,
      nightly_rate: input.nightly_rate,
      amenities:    input.amenities,
      status:       RoomStatus::Available,
      created_at:   Utc::now(),
    };

    self.insert_room(&room).await?;
    Ok(room)
  }

  async fn get_room(&self, id: Uuid) -> Result<Option<Room>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRoom> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE room_id = ?1"),
              rusqlite::params![id_str],
              room_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRoom::into_room).transpose()
  }

  async fn list_rooms(&self, status: Option<RoomStatus>) -> Result<Vec<Room>> {
    let status_str = status.map(encode_room_status).map(str::to_owned);

    let raws: Vec<RawRoom> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE status = ?1 ORDER BY number"
          ))?;
          stmt
            .query_map(rusqlite::params![s], room_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms ORDER BY number"
          ))?;
          stmt
            .query_map([], room_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRoom::into_room).collect()
  }

  async fn update_room(&self, id: Uuid, patch: RoomPatch) -> Result<Option<Room>> {
    // Read-modify-write: merge in Rust, write the whole row back. Rooms see
    // no concurrent writers beyond last-write-wins, which is the documented
    // conflict policy.
    let Some(room) = self.get_room(id).await? else {
      return Ok(None);
    };

    let updated = patch.apply_to(room);
    self.insert_room(&updated).await?;
    Ok(Some(updated))
  }

  // ── Reservations ────────────────────────────────────────────────────────

  async fn get_reservation(&self, id: Uuid) -> Result<Option<Reservation>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawReservation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations \
                 WHERE reservation_id = ?1"
              ),
              rusqlite::params![id_str],
              reservation_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReservation::into_reservation).transpose()
  }

  async fn list_reservations(
    &self,
    status: Option<ReservationStatus>,
  ) -> Result<Vec<Reservation>> {
    let status_str = status.map(encode_reservation_status).map(str::to_owned);

    let raws: Vec<RawReservation> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE status = ?1 ORDER BY created_at"
          ))?;
          stmt
            .query_map(rusqlite::params![s], reservation_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations ORDER BY created_at"
          ))?;
          stmt
            .query_map([], reservation_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawReservation::into_reservation)
      .collect()
  }

  // ── Invoices ────────────────────────────────────────────────────────────

  async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawInvoice> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_id = ?1"
              ),
              rusqlite::params![id_str],
              invoice_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInvoice::into_invoice).transpose()
  }

  async fn invoice_for_reservation(
    &self,
    reservation_id: Uuid,
  ) -> Result<Option<Invoice>> {
    let id_str = encode_uuid(reservation_id);

    let raw: Option<RawInvoice> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INVOICE_COLUMNS} FROM invoices \
                 WHERE reservation_id = ?1"
              ),
              rusqlite::params![id_str],
              invoice_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInvoice::into_invoice).transpose()
  }

  async fn list_invoices(&self) -> Result<Vec<Invoice>> {
    let raws: Vec<RawInvoice> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY invoice_date"
        ))?;
        let rows = stmt
          .query_map([], invoice_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInvoice::into_invoice).collect()
  }

  async fn delete_invoice(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM invoices WHERE invoice_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(removed)
  }

  async fn purge_invoices(&self) -> Result<u64> {
    let removed = self
      .conn
      .call(|conn| {
        let n = conn.execute("DELETE FROM invoices", [])?;
        Ok(n as u64)
      })
      .await?;

    Ok(removed)
  }

  // ── Atomic writes ───────────────────────────────────────────────────────

  async fn apply(&self, batch: WriteBatch) -> Result<()> {
    let encoded: Vec<EncodedWrite> =
      batch.writes.iter().map(encode_write).collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for write in &encoded {
          execute_write(&tx, write)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
