pub mod filter;
pub mod functions;
pub mod mapping;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;

use anyhow::Result;
use colcrypt_crypto::ColumnCipher;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path, cipher: ColumnCipher) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let db = Self::init(conn, cipher)?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory(cipher: ColumnCipher) -> Result<Self> {
        let db = Self::init(Connection::open_in_memory()?, cipher)?;
        info!("In-memory database opened");
        Ok(db)
    }

    fn init(conn: Connection, cipher: ColumnCipher) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        functions::register(&conn, Arc::new(cipher))?;
        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Like [`Database::with_conn`], but hands out a mutable connection so the
    /// closure can open a transaction.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&mut conn)
    }
}
