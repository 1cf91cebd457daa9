//! Activity log files: time, user and songplay rows from `NextSong` events.

use super::json_lines::read_json_lines;
use super::records::{NextSongEvent, PageView};
use super::{FileStats, RecordError};
use crate::warehouse::{TimeRow, WarehouseWriter};
use anyhow::Result;
use std::path::Path;
use tracing::debug;

struct PlayEvent {
    event: NextSongEvent,
    time: TimeRow,
}

/// Decode every line, keeping the `NextSong` events.
///
/// Any malformed line fails the whole file before anything is written.
fn read_play_events(path: &Path) -> Result<(usize, Vec<PlayEvent>), RecordError> {
    let lines = read_json_lines(path)?;
    let mut plays = Vec::new();
    for line in &lines {
        let view: PageView = line.decode()?;
        if !view.is_next_song() {
            continue;
        }
        let event: NextSongEvent = line.decode()?;
        let time = event.time_row().ok_or_else(|| RecordError::MalformedRecord {
            line: line.line,
            reason: format!("ts {} is out of range", event.ts),
        })?;
        plays.push(PlayEvent { event, time });
    }
    Ok((lines.len(), plays))
}

/// Load a log file.
///
/// Time rows are written for all events first, then user rows, then one
/// songplay per event with its song and artist resolved by exact match.
pub fn process_log_file(writer: &dyn WarehouseWriter, path: &Path) -> Result<FileStats> {
    let (records_read, plays) = read_play_events(path)?;
    let mut stats = FileStats {
        records_read,
        records_skipped: records_read - plays.len(),
        ..Default::default()
    };

    for play in &plays {
        if writer.insert_time(&play.time)? {
            stats.time_inserted += 1;
        } else {
            stats.conflicts_ignored += 1;
        }
    }

    for play in &plays {
        if writer.insert_user(&play.event.user_row())? {
            stats.users_inserted += 1;
        } else {
            stats.conflicts_ignored += 1;
        }
    }

    for play in &plays {
        let event = &play.event;
        let song = writer.find_song(&event.song, &event.artist, event.length)?;
        if song.is_none() {
            debug!(
                "No song matches {:?} by {:?} ({}s)",
                event.song, event.artist, event.length
            );
            stats.unresolved_songplays += 1;
        }
        writer.insert_songplay(&event.songplay_row(song))?;
        stats.songplays_inserted += 1;
    }

    Ok(stats)
}
