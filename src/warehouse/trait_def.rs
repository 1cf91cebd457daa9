//! WarehouseWriter trait definition.

use super::models::{ArtistRow, SongMatch, SongRow, SongplayRow, TimeRow, UserRow};
use anyhow::Result;

/// Write access to the warehouse tables, handed to the file transformers.
///
/// Implementations decide the transaction boundary; transformers only issue
/// statements and never commit.
pub trait WarehouseWriter {
    /// Insert an artist, ignoring conflicts. Returns `true` if a new row was written.
    fn insert_artist(&self, artist: &ArtistRow) -> Result<bool>;

    /// Insert a song. A duplicate `song_id` is an error.
    fn insert_song(&self, song: &SongRow) -> Result<()>;

    /// Insert a user, ignoring conflicts. Returns `true` if a new row was written.
    fn insert_user(&self, user: &UserRow) -> Result<bool>;

    /// Insert a time dimension row, ignoring conflicts. Returns `true` if a new row was written.
    fn insert_time(&self, time: &TimeRow) -> Result<bool>;

    /// Look up the song with exactly this title, artist name and duration.
    fn find_song(&self, title: &str, artist_name: &str, duration: f64)
        -> Result<Option<SongMatch>>;

    /// Append a songplay fact row, returning its `songplay_id`.
    fn insert_songplay(&self, songplay: &SongplayRow) -> Result<i64>;
}
