//! In-memory SQLite store for climate period reports.
//!
//! Station lists and per-station period values are loaded from CSV into an
//! in-memory database and read back as typed [`Station`](clim_core::Station)
//! and [`PeriodRecord`](clim_core::PeriodRecord) values. The store also acts
//! as the review session's source of monthly summary messages.
//!
//! # Usage
//!
//! ```rust
//! use clim_db::{Database, ValueSource};
//!
//! let db = Database::new().unwrap();
//! db.load_stations("INFORM_ID,ICAO,NAME\n101,KDEN,Denver\n").unwrap();
//! db.load_period_values("D,101,max_temp,97,,20230705\n").unwrap();
//!
//! let stations = db.query_stations().unwrap();
//! let daily = db.query_period_record(ValueSource::Daily, 101).unwrap();
//! assert_eq!(stations.len(), 1);
//! assert!(daily.is_some());
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `stations` - Station metadata in report order
//! - `period_values` - One row per source, station and field

pub mod schema;
mod loader;
mod queries;
pub mod models;
mod provider;

pub use models::ValueSource;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding one period report.
///
/// Cheaply cloneable (via `Rc`); clones share the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it with CSV data.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
