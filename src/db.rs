//! SQLite connection helper.
//!
//! Every store operation opens its own scoped connection; dropping it
//! releases the handle on every exit path. Foreign keys are enabled per
//! connection so deleting a user cascades to their todos.

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path).context("Failed to open database")?;
    conn.pragma_update(None, "journal_mode", "WAL").ok();
    conn.pragma_update(None, "synchronous", "NORMAL").ok();
    conn.pragma_update(None, "foreign_keys", "ON")
        .context("Failed to enable foreign keys")?;
    Ok(conn)
}
