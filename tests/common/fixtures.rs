//! Temporary data trees and databases for the pipeline tests.

use serde_json::json;
use sparkify_etl::SqliteWarehouse;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory holding a song tree, a log tree and a database file.
pub struct TestData {
    // Removed on drop.
    _dir: TempDir,
    pub song_root: PathBuf,
    pub log_root: PathBuf,
    pub db_path: PathBuf,
}

impl TestData {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let song_root = dir.path().join("song_data");
        let log_root = dir.path().join("log_data");
        fs::create_dir_all(&song_root).expect("Failed to create song dir");
        fs::create_dir_all(&log_root).expect("Failed to create log dir");
        let db_path = dir.path().join("sparkify.db");
        TestData {
            _dir: dir,
            song_root,
            log_root,
            db_path,
        }
    }

    pub fn write_song(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.song_root, relative, content)
    }

    pub fn write_log(&self, relative: &str, lines: &[String]) -> PathBuf {
        write_file(&self.log_root, relative, &lines.join("\n"))
    }

    pub fn open_warehouse(&self) -> SqliteWarehouse {
        SqliteWarehouse::open(&self.db_path).expect("Failed to open warehouse")
    }

    /// Rows of `sql`, each column rendered as text.
    pub fn query_strings(&self, warehouse: &SqliteWarehouse, sql: &str) -> Vec<Vec<String>> {
        let conn = warehouse.connection();
        let mut stmt = conn.prepare(sql).expect("Failed to prepare query");
        let columns = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..columns)
                    .map(|i| {
                        let value: rusqlite::types::Value = row.get(i)?;
                        Ok(match value {
                            rusqlite::types::Value::Null => "NULL".to_string(),
                            rusqlite::types::Value::Integer(n) => n.to_string(),
                            rusqlite::types::Value::Real(f) => f.to_string(),
                            rusqlite::types::Value::Text(s) => s,
                            rusqlite::types::Value::Blob(_) => "BLOB".to_string(),
                        })
                    })
                    .collect::<rusqlite::Result<Vec<String>>>()
            })
            .expect("Failed to run query");
        rows.map(|r| r.expect("Failed to read row")).collect()
    }
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("Path has no parent")).expect("Failed to create dirs");
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// One activity log line. `song` is `None` for non-play pages.
pub fn log_line(
    page: &str,
    ts: i64,
    user_id: &str,
    level: &str,
    song: Option<(&str, &str, f64)>,
) -> String {
    let (title, artist, length) = match song {
        Some((title, artist, length)) => (json!(title), json!(artist), json!(length)),
        None => (json!(null), json!(null), json!(null)),
    };
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Lily",
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Koch",
        "length": length,
        "level": level,
        "location": "Chicago-Naperville-Elgin, IL-IN-WI",
        "method": "PUT",
        "page": page,
        "registration": 1541048010796.0_f64,
        "sessionId": 818,
        "song": title,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
        "userId": user_id
    })
    .to_string()
}
