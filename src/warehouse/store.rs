//! SQLite-backed warehouse.
//!
//! `SqliteWarehouse` owns the single connection used by a run. Each input file
//! is loaded through a `LoadSession`, which wraps one SQL transaction.

use super::models::*;
use super::schema::*;
use super::trait_def::WarehouseWriter;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use tracing::info;

pub struct SqliteWarehouse {
    conn: Connection,
}

fn create_or_validate(conn: &Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = WAREHOUSE_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &WAREHOUSE_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating warehouse schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    if db_version != (BASE_DB_VERSION + latest_version) as i64 {
        bail!(
            "Database has user_version {}, expected {}. Run with --reset to rebuild it.",
            db_version,
            BASE_DB_VERSION + latest_version
        );
    }
    latest_schema
        .validate(conn)
        .context("Existing database does not match the warehouse schema")?;
    Ok(())
}

impl SqliteWarehouse {
    /// Open (or create) the warehouse database at `db_path`.
    ///
    /// A fresh database gets the full schema; an existing one is validated.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open warehouse database {:?}", db_path))?;
        Self::from_connection(conn)
    }

    /// Open the database at `db_path` and rebuild the warehouse tables,
    /// skipping validation of whatever schema was there before.
    pub fn open_with_reset<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open warehouse database {:?}", db_path))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let mut warehouse = SqliteWarehouse { conn };
        warehouse.reset()?;
        Ok(warehouse)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        create_or_validate(&conn)?;
        Ok(SqliteWarehouse { conn })
    }

    /// Drop every warehouse table and create the schema again.
    pub fn reset(&mut self) -> Result<()> {
        let schema = &WAREHOUSE_VERSIONED_SCHEMAS[WAREHOUSE_VERSIONED_SCHEMAS.len() - 1];
        let tx = self.conn.transaction()?;
        schema.drop_all(&tx)?;
        schema.create(&tx)?;
        tx.commit()?;
        info!("Warehouse tables dropped and re-created");
        Ok(())
    }

    /// Start loading one file. Nothing is persisted until `LoadSession::commit`.
    pub fn begin_file(&mut self) -> Result<LoadSession<'_>> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin file transaction")?;
        Ok(LoadSession { tx })
    }

    pub fn counts(&self) -> Result<TableCounts> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
            Ok(n as usize)
        };
        Ok(TableCounts {
            artists: count("artists")?,
            songs: count("songs")?,
            users: count("users")?,
            time: count("time")?,
            songplays: count("songplays")?,
        })
    }

    /// Raw access for ad-hoc queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Writes for a single input file, committed as one transaction.
///
/// Dropping the session without calling `commit` rolls the file back.
pub struct LoadSession<'conn> {
    tx: Transaction<'conn>,
}

impl LoadSession<'_> {
    pub fn commit(self) -> Result<()> {
        self.tx.commit().context("Failed to commit file transaction")
    }
}

impl WarehouseWriter for LoadSession<'_> {
    fn insert_artist(&self, artist: &ArtistRow) -> Result<bool> {
        let mut stmt = self.tx.prepare_cached(ARTIST_INSERT)?;
        let changed = stmt.execute(params![
            artist.artist_id,
            artist.name,
            artist.location,
            artist.latitude,
            artist.longitude,
        ])?;
        Ok(changed > 0)
    }

    fn insert_song(&self, song: &SongRow) -> Result<()> {
        let mut stmt = self.tx.prepare_cached(SONG_INSERT)?;
        stmt.execute(params![
            song.song_id,
            song.title,
            song.artist_id,
            song.year,
            song.duration,
        ])
        .with_context(|| format!("Failed to insert song {}", song.song_id))?;
        Ok(())
    }

    fn insert_user(&self, user: &UserRow) -> Result<bool> {
        let mut stmt = self.tx.prepare_cached(USER_INSERT)?;
        let changed = stmt.execute(params![
            user.user_id,
            user.first_name,
            user.last_name,
            user.gender,
            user.level,
        ])?;
        Ok(changed > 0)
    }

    fn insert_time(&self, time: &TimeRow) -> Result<bool> {
        let mut stmt = self.tx.prepare_cached(TIME_INSERT)?;
        let changed = stmt.execute(params![
            time.start_time,
            time.hour,
            time.day,
            time.week,
            time.month,
            time.year,
            time.weekday,
        ])?;
        Ok(changed > 0)
    }

    fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongMatch>> {
        let mut stmt = self.tx.prepare_cached(SONG_SELECT)?;
        match stmt.query_row(params![title, artist_name, duration], |r| {
            Ok(SongMatch {
                song_id: r.get(0)?,
                artist_id: r.get(1)?,
            })
        }) {
            Ok(found) => Ok(Some(found)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_songplay(&self, songplay: &SongplayRow) -> Result<i64> {
        let (song_id, artist_id) = match &songplay.song {
            Some(found) => (Some(found.song_id.as_str()), Some(found.artist_id.as_str())),
            None => (None, None),
        };
        let mut stmt = self.tx.prepare_cached(SONGPLAY_INSERT)?;
        stmt.execute(params![
            songplay.start_time,
            songplay.user_id,
            songplay.level,
            song_id,
            artist_id,
            songplay.session_id,
            songplay.location,
            songplay.user_agent,
        ])?;
        Ok(self.tx.last_insert_rowid())
    }
}
