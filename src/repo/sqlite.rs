use crate::models::backup_row::BackupRow;
use crate::models::error::{AdminError, Result};
use crate::models::user_row::UserRow;
use log::{debug, info};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OptionalExtension;
use std::sync::Arc;

type DbPool = Pool<SqliteConnectionManager>;

/// Cloneable handle to the connection pool, shared through Rocket state.
#[derive(Clone)]
pub struct Db {
    pool: Arc<DbPool>,
}

impl Db {
    fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }
}

pub fn open_db_pool(db_file: &str) -> Result<Db> {
    if db_file.is_empty() {
        return Err(AdminError::InvalidConfig(
            "Database file path cannot be empty. Provide a valid path or use ':memory:' for in-memory database.".to_string()
        ));
    }

    info!("Initializing database connection pool: {}", db_file);

    let is_in_memory = db_file == ":memory:" || db_file.starts_with("file::memory:");
    let use_wal = !is_in_memory;

    let manager = SqliteConnectionManager::file(db_file).with_init(move |conn| {
        let mut pragmas = String::from(
            "PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;",
        );

        if use_wal {
            pragmas.push_str(" PRAGMA journal_mode = WAL;");
        }

        conn.execute_batch(&pragmas)
    });

    // A plain ":memory:" database exists once per connection, so it must
    // never be spread over more than one.
    let pool_size = if db_file == ":memory:" {
        1
    } else {
        num_cpus::get_physical() + 7
    };
    let pool = r2d2::Pool::builder()
        .max_size(pool_size as u32)
        .build(manager)
        .map_err(|cause| AdminError::DatabasePool {
            path: db_file.to_string(),
            cause,
        })?;

    info!("Database pool created with {} connections", pool_size);

    Ok(Db {
        pool: Arc::new(pool),
    })
}

/// Column names match what the external backup script writes.
pub fn setup_database(db: &Db) -> Result<()> {
    info!("Initializing database schema");
    let setup_queries = "BEGIN;
    PRAGMA ENCODING = 'UTF-8';

    CREATE TABLE IF NOT EXISTS users(
        id            integer not null
            constraint users_id_pk
                primary key autoincrement,
        username      TEXT    not null
            constraint users_username_key
                unique,
        password      TEXT    not null);

    CREATE TABLE IF NOT EXISTS backups(
        id             integer not null
            constraint backups_id_pk
                primary key autoincrement,
        timestamp      TEXT,
        total_files    integer,
        uploaded_files integer,
        remote_path    TEXT);

    CREATE INDEX IF NOT EXISTS backups_timestamp_index
            on backups (timestamp DESC);

    COMMIT;";

    let conn = db.get_connection()?;
    conn.execute_batch(setup_queries)
        .map_err(|cause| AdminError::DatabaseQuery {
            operation: "create tables".to_string(),
            cause,
        })?;
    info!("Database schema initialized successfully");
    Ok(())
}

pub fn select_user(db: &Db, username: &str) -> Result<Option<UserRow>> {
    let conn = db.get_connection()?;
    conn.query_row(
        "SELECT id, username, password
                FROM users
                WHERE username=?1",
        [username],
        |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|cause| AdminError::DatabaseQuery {
        operation: format!("select user {}", username),
        cause,
    })
}

/// Returns false when the username is already taken.
pub fn insert_user(db: &Db, username: &str, password_hash: &str) -> Result<bool> {
    let conn = db.get_connection()?;
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO users (username, password) VALUES (?1, ?2)",
            (username, password_hash),
        )
        .map_err(|cause| AdminError::DatabaseQuery {
            operation: format!("insert user {}", username),
            cause,
        })?;
    debug!("Inserted {} user row(s) for {}", inserted, username);
    Ok(inserted > 0)
}

/// All backup records, newest first.
pub fn select_backups(db: &Db) -> Result<Vec<BackupRow>> {
    let conn = db.get_connection()?;
    let mut stmt = conn
        .prepare(
            "SELECT id,
                    COALESCE(timestamp, ''),
                    COALESCE(total_files, 0),
                    COALESCE(uploaded_files, 0),
                    COALESCE(remote_path, '')
                FROM backups
                ORDER BY timestamp DESC",
        )
        .map_err(|cause| AdminError::DatabaseQuery {
            operation: "select backups".to_string(),
            cause,
        })?;

    let rows = stmt
        .query_map([], |row| {
            Ok(BackupRow {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                total_files: row.get(2)?,
                uploaded_files: row.get(3)?,
                remote_path: row.get(4)?,
            })
        })
        .map_err(|cause| AdminError::DatabaseQuery {
            operation: "select backups".to_string(),
            cause,
        })?;

    rows.collect::<rusqlite::Result<Vec<BackupRow>>>()
        .map_err(|cause| AdminError::DatabaseQuery {
            operation: "collect backup rows".to_string(),
            cause,
        })
}

/// Deletes the row if it exists. Returns the number of rows removed.
pub fn delete_backup(db: &Db, id: i64) -> Result<usize> {
    let conn = db.get_connection()?;
    let deleted = conn
        .execute("DELETE FROM backups WHERE id=?1", [id])
        .map_err(|cause| AdminError::DatabaseQuery {
            operation: format!("delete backup {}", id),
            cause,
        })?;
    debug!("Deleted {} backup row(s) for id {}", deleted, id);
    Ok(deleted)
}

/// Rows normally come from the backup script; tests stand in for it.
#[cfg(test)]
pub fn insert_backup_row(
    db: &Db,
    timestamp: &str,
    total_files: i64,
    uploaded_files: i64,
    remote_path: &str,
) -> Result<i64> {
    let conn = db.get_connection()?;
    conn.query_row(
        "INSERT INTO backups (timestamp, total_files, uploaded_files, remote_path)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id",
        (timestamp, total_files, uploaded_files, remote_path),
        |row| row.get(0),
    )
    .map_err(|cause| AdminError::DatabaseQuery {
        operation: "insert backup".to_string(),
        cause,
    })
}

#[cfg(test)]
pub fn setup_test_db() -> (Db, tempfile::TempDir) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let db_file = temp_dir.path().join("backup_admin.db");
    let db = open_db_pool(db_file.to_str().unwrap()).unwrap();
    setup_database(&db).unwrap();
    (db, temp_dir)
}
