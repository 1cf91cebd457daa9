//! Song metadata files: one artist row and one song row per file.

use super::json_lines::read_json_lines;
use super::records::SongRecord;
use super::{FileStats, RecordError};
use crate::warehouse::WarehouseWriter;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Load the first record of a song file. Further records are ignored.
pub fn process_song_file(writer: &dyn WarehouseWriter, path: &Path) -> Result<FileStats> {
    let lines = read_json_lines(path)?;
    let first = lines.first().ok_or(RecordError::Empty)?;
    let record: SongRecord = first.decode()?;
    if lines.len() > 1 {
        debug!(
            "{} holds {} records, only the first is loaded",
            path.display(),
            lines.len()
        );
    }

    let mut stats = FileStats {
        records_read: lines.len(),
        ..Default::default()
    };

    // Artist first: songs.artist_id references it.
    if writer.insert_artist(&record.artist_row())? {
        stats.artists_inserted += 1;
    } else {
        stats.conflicts_ignored += 1;
    }
    writer.insert_song(&record.song_row())?;
    stats.songs_inserted += 1;

    Ok(stats)
}
