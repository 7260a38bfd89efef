use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ApiError, ApiResult};

/// Access/refresh token pair identifying an authenticated client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Role reported by the server at login, used to pick the start screen
    pub role: Option<String>,
    pub user_name: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            role: None,
            user_name: None,
        }
    }
}

/// Persistent token storage backed by a single-row SQLite table
pub struct SessionStore {
    conn: Mutex<Connection>,
}

impl SessionStore {
    /// Open the store at the default data location (or `path` if given)
    pub fn open(path: Option<&Path>) -> ApiResult<Self> {
        let db_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let dir = Self::get_data_dir();
                std::fs::create_dir_all(&dir).map_err(|e| ApiError::Storage(e.to_string()))?;
                dir.join("session.db")
            }
        };

        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> ApiResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> ApiResult<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                access_token TEXT NOT NULL,
                refresh_token TEXT,
                role TEXT,
                user_name TEXT
            );
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn get_data_dir() -> PathBuf {
        if let Some(data_dir) = dirs::data_dir() {
            data_dir.join("noticetui")
        } else {
            std::env::temp_dir().join("noticetui-data")
        }
    }

    fn lock(&self) -> ApiResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ApiError::Storage("session store lock poisoned".to_string()))
    }

    pub fn load(&self) -> ApiResult<Option<Session>> {
        let conn = self.lock()?;
        let session = conn
            .query_row(
                "SELECT access_token, refresh_token, role, user_name FROM session WHERE id = 1",
                [],
                |row| {
                    Ok(Session {
                        access_token: row.get(0)?,
                        refresh_token: row.get(1)?,
                        role: row.get(2)?,
                        user_name: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    pub fn save(&self, session: &Session) -> ApiResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO session (id, access_token, refresh_token, role, user_name)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                session.access_token,
                session.refresh_token,
                session.role,
                session.user_name
            ],
        )?;
        Ok(())
    }

    /// Replace only the access token. Returns false when no session exists.
    pub fn replace_access_token(&self, access_token: &str) -> ApiResult<bool> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE session SET access_token = ?1 WHERE id = 1",
            params![access_token],
        )?;
        Ok(changed > 0)
    }

    pub fn clear(&self) -> ApiResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM session", [])?;
        Ok(())
    }
}
