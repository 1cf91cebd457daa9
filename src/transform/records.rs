//! Typed input records.
//!
//! Song files carry one `SongRecord` per line. Log files carry page-view
//! events of which only `NextSong` ones are decoded into `NextSongEvent`.

use crate::warehouse::{ArtistRow, SongMatch, SongRow, SongplayRow, TimeRow, UserRow};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub const NEXT_SONG_PAGE: &str = "NextSong";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SongRecord {
    pub artist_id: String,
    pub artist_name: String,
    pub artist_location: String,
    // Required but nullable.
    #[serde(deserialize_with = "Option::deserialize")]
    pub artist_latitude: Option<f64>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub artist_longitude: Option<f64>,
    pub song_id: String,
    pub title: String,
    pub year: i32,
    pub duration: f64,
}

impl SongRecord {
    pub fn artist_row(&self) -> ArtistRow {
        ArtistRow {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }

    pub fn song_row(&self) -> SongRow {
        SongRow {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }
}

/// Just enough of a log line to decide whether it is a play event.
#[derive(Debug, Deserialize)]
pub struct PageView {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageView {
    pub fn is_next_song(&self) -> bool {
        self.page.as_deref() == Some(NEXT_SONG_PAGE)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NextSongEvent {
    pub ts: i64,
    #[serde(deserialize_with = "deserialize_user_id")]
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub level: String,
    pub song: String,
    pub artist: String,
    pub length: f64,
    pub session_id: i64,
    pub location: String,
    pub user_agent: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserIdRepr {
    Text(String),
    Number(i64),
}

/// Log exports carry `userId` either as a string or as a number.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match UserIdRepr::deserialize(deserializer)? {
        UserIdRepr::Text(text) => text,
        UserIdRepr::Number(number) => number.to_string(),
    };
    if id.trim().is_empty() {
        return Err(D::Error::custom("userId is empty"));
    }
    Ok(id)
}

impl NextSongEvent {
    pub fn time_row(&self) -> Option<TimeRow> {
        TimeRow::from_epoch_millis(self.ts)
    }

    pub fn user_row(&self) -> UserRow {
        UserRow {
            user_id: self.user_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }

    pub fn songplay_row(&self, song: Option<SongMatch>) -> SongplayRow {
        SongplayRow {
            start_time: self.ts,
            user_id: self.user_id.clone(),
            level: self.level.clone(),
            song,
            session_id: self.session_id,
            location: self.location.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}
