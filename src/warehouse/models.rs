//! Rows written to the warehouse tables.

use chrono::{DateTime, Datelike, Timelike, Utc};

#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub level: String,
}

/// Calendar breakdown of one event timestamp, in UTC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeRow {
    /// Milliseconds since the Unix epoch.
    pub start_time: i64,
    pub hour: i32,
    pub day: i32,
    /// ISO-8601 week number.
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// Monday = 0 through Sunday = 6.
    pub weekday: i32,
}

impl TimeRow {
    /// Returns `None` when `millis` is outside the range chrono can represent.
    pub fn from_epoch_millis(millis: i64) -> Option<TimeRow> {
        let instant = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(TimeRow {
            start_time: millis,
            hour: instant.hour() as i32,
            day: instant.day() as i32,
            week: instant.iso_week().week() as i32,
            month: instant.month() as i32,
            year: instant.year(),
            weekday: instant.weekday().num_days_from_monday() as i32,
        })
    }
}

/// Song and artist ids resolved for a play event. Always both or neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongMatch {
    pub song_id: String,
    pub artist_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongplayRow {
    pub start_time: i64,
    pub user_id: String,
    pub level: String,
    pub song: Option<SongMatch>,
    pub session_id: i64,
    pub location: String,
    pub user_agent: String,
}

/// Row count of every warehouse table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub artists: usize,
    pub songs: usize,
    pub users: usize,
    pub time: usize,
    pub songplays: usize,
}
