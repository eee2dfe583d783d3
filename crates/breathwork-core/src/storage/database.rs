//! SQLite-based session storage.
//!
//! Provides persistent storage for:
//! - Completed breathing sessions (the source of truth for statistics)
//! - The last computed statistics snapshot
//! - Key-value store for application state

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::session::Session;
use crate::stats::{self, StatsSnapshot};

const SNAPSHOT_KEY: &str = "stats_snapshot";

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/breathwork.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("breathwork.db"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::info!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           TEXT PRIMARY KEY,
                exercise_id  TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                duration_min INTEGER NOT NULL,
                cycles       INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
        )?;
        Ok(())
    }

    /// Store a completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails (including a duplicate id).
    pub fn record_session(&self, session: &Session) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (id, exercise_id, completed_at, duration_min, cycles)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.id,
                session.exercise_id,
                session.timestamp.to_rfc3339(),
                session.duration_minutes,
                session.cycles_completed,
            ],
        )?;
        Ok(())
    }

    /// Full history, oldest first.
    pub fn sessions(&self) -> Result<Vec<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, exercise_id, completed_at, duration_min, cycles
             FROM sessions
             ORDER BY completed_at ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, exercise_id, completed_at, duration_minutes, cycles_completed) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| DatabaseError::CorruptRow {
                    table: "sessions".into(),
                    message: format!("bad completed_at '{completed_at}' for {id}: {e}"),
                })?
                .with_timezone(&Utc);
            sessions.push(Session {
                id,
                exercise_id,
                timestamp,
                duration_minutes,
                cycles_completed,
            });
        }
        Ok(sessions)
    }

    /// Append a session to the history and persist the recomputed snapshot.
    ///
    /// Both writes happen in one transaction.
    pub fn append_session<Tz: TimeZone>(
        &self,
        session: Session,
        as_of: &DateTime<Tz>,
    ) -> Result<StatsSnapshot> {
        let history = self.sessions()?;
        let (_, snapshot) = stats::append_session(history, session.clone(), as_of);

        let tx = self.conn.unchecked_transaction()?;
        self.record_session(&session)?;
        self.save_snapshot(&snapshot)?;
        tx.commit()?;

        tracing::info!(
            exercise = %session.exercise_id,
            minutes = session.duration_minutes,
            streak = snapshot.current_streak,
            "session recorded"
        );
        Ok(snapshot)
    }

    pub fn save_snapshot(&self, snapshot: &StatsSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.kv_set(SNAPSHOT_KEY, &json)
    }

    /// Last persisted snapshot, if any was saved.
    pub fn load_snapshot(&self) -> Result<Option<StatsSnapshot>> {
        match self.kv_get(SNAPSHOT_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn record_and_list_sessions() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        let older = Session::from_run("deep", 144, 12, now - Duration::days(1));
        let newer = Session::from_run("478", 152, 8, now);
        db.record_session(&newer).unwrap();
        db.record_session(&older).unwrap();

        let sessions = db.sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, older.id);
        assert_eq!(sessions[1].exercise_id, "478");
        assert_eq!(sessions[1].duration_minutes, 3);
        assert_eq!(sessions[1].timestamp.timestamp(), now.timestamp());
    }

    #[test]
    fn duplicate_session_id_is_rejected() {
        let db = Database::open_memory().unwrap();
        let s = Session::from_run("box", 240, 15, Utc::now());
        db.record_session(&s).unwrap();
        assert!(db.record_session(&s).is_err());
    }

    #[test]
    fn append_session_persists_snapshot() {
        let db = Database::open_memory().unwrap();
        assert!(db.load_snapshot().unwrap().is_none());

        let now = Utc::now();
        let snap = db
            .append_session(Session::from_run("478", 152, 8, now), &now)
            .unwrap();
        assert_eq!(snap.sessions_today, 1);
        assert_eq!(snap.total_minutes, 3);
        assert_eq!(snap.current_streak, 1);

        assert_eq!(db.load_snapshot().unwrap(), Some(snap));
        assert_eq!(db.sessions().unwrap().len(), 1);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }
}
