//! Per-file transformers turning JSON input files into warehouse rows.

mod error;
mod json_lines;
mod log_file;
mod records;
mod song_file;

pub use error::RecordError;
pub use json_lines::{parse_json_lines, read_json_lines, JsonLine};
pub use log_file::process_log_file;
pub use records::{NextSongEvent, PageView, SongRecord, NEXT_SONG_PAGE};
pub use song_file::process_song_file;

use crate::warehouse::WarehouseWriter;
use anyhow::Result;
use std::ops::AddAssign;
use std::path::Path;

/// Signature shared by the per-file transformers.
pub type FileTransformer = fn(&dyn WarehouseWriter, &Path) -> Result<FileStats>;

/// What loading one file (or a run of files) did to the warehouse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileStats {
    pub records_read: usize,
    /// Log records whose page is not `NextSong`.
    pub records_skipped: usize,
    pub artists_inserted: usize,
    pub songs_inserted: usize,
    pub users_inserted: usize,
    pub time_inserted: usize,
    pub songplays_inserted: usize,
    /// Rows dropped by ON CONFLICT DO NOTHING.
    pub conflicts_ignored: usize,
    /// Songplays stored without a song and artist.
    pub unresolved_songplays: usize,
}

impl AddAssign for FileStats {
    fn add_assign(&mut self, other: FileStats) {
        self.records_read += other.records_read;
        self.records_skipped += other.records_skipped;
        self.artists_inserted += other.artists_inserted;
        self.songs_inserted += other.songs_inserted;
        self.users_inserted += other.users_inserted;
        self.time_inserted += other.time_inserted;
        self.songplays_inserted += other.songplays_inserted;
        self.conflicts_ignored += other.conflicts_ignored;
        self.unresolved_songplays += other.unresolved_songplays;
    }
}

/// The two input datasets, in the order they must be loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dataset {
    Songs,
    Logs,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Songs => "song data",
            Dataset::Logs => "log data",
        }
    }

    pub fn transformer(&self) -> FileTransformer {
        match self {
            Dataset::Songs => process_song_file,
            Dataset::Logs => process_log_file,
        }
    }
}
