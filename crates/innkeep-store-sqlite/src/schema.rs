//! SQL schema for the Innkeep SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Rooms are durable: no DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS rooms (
    room_id      TEXT PRIMARY KEY,
    number       TEXT NOT NULL UNIQUE,
    room_type    TEXT NOT NULL,   -- 'standard' | 'deluxe' | 'suite' | 'penthouse'
    floor        INTEGER NOT NULL,
    capacity     INTEGER NOT NULL,
    nightly_rate TEXT NOT NULL,   -- decimal as text; no float drift
    amenities    TEXT NOT NULL DEFAULT '[]',
    status       TEXT NOT NULL DEFAULT 'available',
    created_at   TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS reservations (
    reservation_id TEXT PRIMARY KEY,
    guest_name     TEXT NOT NULL,
    guest_email    TEXT,
    guest_phone    TEXT,
    room_id        TEXT NOT NULL REFERENCES rooms(room_id),
    room_number    TEXT NOT NULL,  -- snapshot, frozen at booking/amend
    room_type      TEXT NOT NULL,  -- snapshot
    check_in       TEXT NOT NULL,  -- calendar date, 'YYYY-MM-DD'
    check_out      TEXT NOT NULL,
    guest_count    INTEGER NOT NULL,
    total_amount   TEXT NOT NULL,
    notes          TEXT NOT NULL DEFAULT '',
    status         TEXT NOT NULL,  -- one canonical spelling per status
    created_at     TEXT NOT NULL
);

-- UNIQUE(reservation_id) backs the one-invoice-per-stay invariant: the
-- front desk's existing-invoice lookup is best-effort, this is the stop.
CREATE TABLE IF NOT EXISTS invoices (
    invoice_id     TEXT PRIMARY KEY,
    reservation_id TEXT NOT NULL UNIQUE,
    guest_name     TEXT NOT NULL,
    guest_email    TEXT,
    guest_phone    TEXT,
    room_number    TEXT NOT NULL,  -- snapshot
    room_type      TEXT NOT NULL,  -- snapshot
    check_in       TEXT NOT NULL,
    check_out      TEXT NOT NULL,
    stay_amount    TEXT NOT NULL,
    amount_due     TEXT NOT NULL,
    amount_paid    TEXT NOT NULL,
    status         TEXT NOT NULL,  -- 'unpaid' | 'paid'
    invoice_date   TEXT NOT NULL,
    due_date       TEXT NOT NULL,
    payment_date   TEXT
);

CREATE INDEX IF NOT EXISTS rooms_status_idx        ON rooms(status);
CREATE INDEX IF NOT EXISTS reservations_status_idx ON reservations(status);
CREATE INDEX IF NOT EXISTS reservations_room_idx   ON reservations(room_id);

PRAGMA user_version = 1;
";
