//! Sink that inserts rows into a local SQLite table.

use crate::{RecordSink, SinkError};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use parking_lot::Mutex;
use rollcall_rs_protocol::IntakeRecord;
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS intake_records (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    submitted_at TEXT NOT NULL,
    user_id      INTEGER NOT NULL,
    username     TEXT,
    school       TEXT NOT NULL,
    grade        TEXT NOT NULL,
    full_name    TEXT NOT NULL,
    phone        TEXT
);
";

/// Inserts one row per record, creating the table on first open.
pub struct SqliteSink {
    /// rusqlite connections are not Sync; all access goes through the lock.
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Open (or create) the database at the given path and ensure the schema.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(SCHEMA)?;
        info!("initialized sqlite sink (path={})", path.as_ref().display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl RecordSink for SqliteSink {
    async fn persist(&self, record: &IntakeRecord) -> Result<(), SinkError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO intake_records
                 (submitted_at, user_id, username, school, grade, full_name, phone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Utc::now().to_rfc3339(),
                record.user_id,
                record.username,
                record.school,
                record.grade,
                record.full_name,
                record.phone,
            ],
        )?;
        debug!("inserted intake row (user_id={})", record.user_id);
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSink;
    use crate::RecordSink;
    use pretty_assertions::assert_eq;
    use rollcall_rs_protocol::IntakeRecord;
    use tempfile::tempdir;

    #[tokio::test]
    async fn rows_round_trip_through_the_table() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("intake.db");
        let sink = SqliteSink::new(&path).expect("sink");

        let record = IntakeRecord {
            user_id: 42,
            username: None,
            school: "Lyceum 1".to_string(),
            grade: "9".to_string(),
            full_name: "Aziz Karimov".to_string(),
            phone: Some("+998901234567".to_string()),
        };
        sink.persist(&record).await.expect("persist");

        let conn = rusqlite::Connection::open(&path).expect("open");
        let (user_id, username, school, phone): (i64, Option<String>, String, Option<String>) =
            conn.query_row(
                "SELECT user_id, username, school, phone FROM intake_records",
                [],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                    ))
                },
            )
            .expect("row");
        assert_eq!(user_id, 42);
        assert_eq!(username, None);
        assert_eq!(school, "Lyceum 1");
        assert_eq!(phone, Some("+998901234567".to_string()));
    }

    #[tokio::test]
    async fn reopening_an_existing_database_keeps_rows() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("intake.db");

        let record = IntakeRecord {
            user_id: 1,
            username: Some("aziz".to_string()),
            school: "School 5".to_string(),
            grade: "8".to_string(),
            full_name: "A B".to_string(),
            phone: None,
        };

        let sink = SqliteSink::new(&path).expect("sink");
        sink.persist(&record).await.expect("persist");
        drop(sink);

        let sink = SqliteSink::new(&path).expect("reopen");
        sink.persist(&record).await.expect("persist again");

        let conn = rusqlite::Connection::open(&path).expect("open");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM intake_records", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 2);
    }
}
