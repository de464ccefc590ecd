//! SQL schema for the Porteria SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS visitors (
    visitor_id      TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    rut             TEXT NOT NULL,   -- normalized national id
    apartment       TEXT NOT NULL,
    entry_time      TEXT NOT NULL,   -- ISO 8601 UTC
    exit_time       TEXT,
    status          TEXT NOT NULL,   -- 'in_building' | 'exited'
    license_plate   TEXT,
    parking_spot_id TEXT REFERENCES parking_spots(spot_id)
);

-- Recall records for returning visitors; one row per national id.
CREATE TABLE IF NOT EXISTS frequent_visitors (
    frequent_id        TEXT PRIMARY KEY,
    name               TEXT NOT NULL,
    rut                TEXT NOT NULL UNIQUE,
    apartment          TEXT NOT NULL,
    last_license_plate TEXT
);

CREATE TABLE IF NOT EXISTS deliveries (
    delivery_id    TEXT PRIMARY KEY,
    apartment      TEXT NOT NULL,
    recipient_name TEXT NOT NULL,
    courier        TEXT NOT NULL,
    status         TEXT NOT NULL,    -- 'pending' | 'picked_up'
    arrival_time   TEXT NOT NULL,
    pickup_time    TEXT,
    retrieved_by   TEXT
);

-- Provisioned once; never deleted in normal operation.
CREATE TABLE IF NOT EXISTS parking_spots (
    spot_id     TEXT PRIMARY KEY,    -- human-assigned, e.g. 'V-01'
    status      TEXT NOT NULL,       -- 'available' | 'occupied'
    kind        TEXT NOT NULL,       -- 'visitor' | 'resident'
    floor       INTEGER NOT NULL,
    assigned_to TEXT,                -- visit id holding the spot, or NULL
    notes       TEXT,
    CHECK ((status = 'occupied') OR (assigned_to IS NULL))
);

CREATE INDEX IF NOT EXISTS visitors_rut_status_idx ON visitors(rut, status);
CREATE INDEX IF NOT EXISTS visitors_entry_idx      ON visitors(entry_time);
CREATE INDEX IF NOT EXISTS deliveries_status_idx   ON deliveries(status);
CREATE INDEX IF NOT EXISTS spots_kind_status_idx   ON parking_spots(kind, status);

PRAGMA user_version = 1;
";
