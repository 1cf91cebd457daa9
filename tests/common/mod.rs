//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestData, SONG_A1_S1};
//!
//! #[test]
//! fn test_load_songs() {
//!     let data = TestData::new();
//!     data.write_song("A/A/A/song.json", SONG_A1_S1);
//!     let mut warehouse = data.open_warehouse();
//!     // ...
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{log_line, TestData};
