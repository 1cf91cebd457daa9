//! End-to-end tests for the song and log loading pipeline.
//!
//! Run with: cargo test --test e2e_pipeline_tests

mod common;

use common::{log_line, TestData, SONG_A1_S1, SONG_A2_S2, TS_1, TS_2, TS_3};
use sparkify_etl::{process_dataset, Dataset, RecordError, SqliteWarehouse, TableCounts};

fn load_all(data: &TestData, warehouse: &mut SqliteWarehouse) -> anyhow::Result<()> {
    process_dataset(warehouse, &data.song_root, Dataset::Songs)?;
    process_dataset(warehouse, &data.log_root, Dataset::Logs)?;
    Ok(())
}

fn write_sample_inputs(data: &TestData) {
    data.write_song("A/A/A/TRAAAAA.json", SONG_A1_S1);
    data.write_song("A/B/C/TRABCDE.json", SONG_A2_S2);
    data.write_log(
        "2018/11/2018-11-02-events.json",
        &[
            log_line("Home", TS_1 - 1000, "10", "free", None),
            log_line("NextSong", TS_1, "10", "free", Some(("title", "name", 1.0))),
            log_line("NextSong", TS_2, "10", "paid", Some(("Unknown", "Nobody", 99.0))),
            log_line("Logout", TS_2 + 1000, "10", "paid", None),
        ],
    );
    data.write_log(
        "2018/11/2018-11-03-events.json",
        &[log_line("NextSong", TS_3, "26", "free", Some(("T", "X", 200.0)))],
    );
}

#[test]
fn test_song_file_yields_artist_and_song() {
    let data = TestData::new();
    data.write_song("A/A/A/TRAAAAA.json", SONG_A1_S1);
    let mut warehouse = data.open_warehouse();

    let summary = process_dataset(&mut warehouse, &data.song_root, Dataset::Songs).unwrap();

    assert_eq!(summary.files_found, 1);
    assert_eq!(summary.files_processed, 1);
    assert_eq!(
        data.query_strings(&warehouse, "SELECT artist_id, name, location, latitude, longitude FROM artists"),
        vec![vec!["A1", "X", "NY", "NULL", "NULL"]]
    );
    assert_eq!(
        data.query_strings(&warehouse, "SELECT song_id, title, artist_id, year, duration FROM songs"),
        vec![vec!["S1", "T", "A1", "2000", "200"]]
    );
}

#[test]
fn test_log_file_ignores_non_play_pages() {
    let data = TestData::new();
    data.write_log(
        "events.json",
        &[
            log_line("NextSong", TS_1, "8", "free", Some(("T", "X", 200.0))),
            log_line("Login", TS_2, "8", "free", None),
        ],
    );
    let mut warehouse = data.open_warehouse();

    let summary = process_dataset(&mut warehouse, &data.log_root, Dataset::Logs).unwrap();

    assert_eq!(summary.totals.records_read, 2);
    assert_eq!(summary.totals.records_skipped, 1);
    assert_eq!(
        warehouse.counts().unwrap(),
        TableCounts {
            time: 1,
            users: 1,
            songplays: 1,
            ..Default::default()
        }
    );
    assert_eq!(
        data.query_strings(
            &warehouse,
            "SELECT start_time, hour, day, week, month, year, weekday FROM time"
        ),
        vec![vec!["1541121934796", "1", "2", "44", "11", "2018", "4"]]
    );
}

#[test]
fn test_full_run_resolves_songplays() {
    let data = TestData::new();
    write_sample_inputs(&data);
    let mut warehouse = data.open_warehouse();

    load_all(&data, &mut warehouse).unwrap();

    assert_eq!(
        warehouse.counts().unwrap(),
        TableCounts {
            artists: 2,
            songs: 2,
            users: 2,
            time: 3,
            songplays: 3,
        }
    );
    assert_eq!(
        data.query_strings(
            &warehouse,
            "SELECT start_time, user_id, level, song_id, artist_id, session_id FROM songplays ORDER BY start_time"
        ),
        vec![
            vec!["1541121934796", "10", "free", "S2", "A2", "818"],
            vec!["1541122241796", "10", "paid", "NULL", "NULL", "818"],
            vec!["1541122543796", "26", "free", "S1", "A1", "818"],
        ]
    );
    // Only the first level seen for a user is kept.
    assert_eq!(
        data.query_strings(&warehouse, "SELECT user_id, level FROM users ORDER BY user_id"),
        vec![vec!["10", "free"], vec!["26", "free"]]
    );
}

#[test]
fn test_songplay_ids_resolve_together_or_not_at_all() {
    let data = TestData::new();
    write_sample_inputs(&data);
    let mut warehouse = data.open_warehouse();

    load_all(&data, &mut warehouse).unwrap();

    let mismatched = data.query_strings(
        &warehouse,
        "SELECT songplay_id FROM songplays WHERE (song_id IS NULL) <> (artist_id IS NULL)",
    );
    assert!(mismatched.is_empty());
}

#[test]
fn test_rerun_on_fresh_schema_gives_same_rows() {
    let data = TestData::new();
    write_sample_inputs(&data);
    let all_tables = [
        "SELECT * FROM artists ORDER BY artist_id",
        "SELECT * FROM songs ORDER BY song_id",
        "SELECT * FROM users ORDER BY user_id",
        "SELECT * FROM time ORDER BY start_time",
        "SELECT * FROM songplays ORDER BY songplay_id",
    ];

    let mut warehouse = data.open_warehouse();
    load_all(&data, &mut warehouse).unwrap();
    let first: Vec<_> = all_tables
        .iter()
        .map(|sql| data.query_strings(&warehouse, sql))
        .collect();
    drop(warehouse);

    let mut warehouse = SqliteWarehouse::open_with_reset(&data.db_path).unwrap();
    load_all(&data, &mut warehouse).unwrap();
    let second: Vec<_> = all_tables
        .iter()
        .map(|sql| data.query_strings(&warehouse, sql))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_rerun_on_populated_schema() {
    let data = TestData::new();
    write_sample_inputs(&data);
    let mut warehouse = data.open_warehouse();
    load_all(&data, &mut warehouse).unwrap();
    drop(warehouse);

    // Log data alone: dimensions are not duplicated, facts are appended.
    let mut warehouse = data.open_warehouse();
    process_dataset(&mut warehouse, &data.log_root, Dataset::Logs).unwrap();
    let counts = warehouse.counts().unwrap();
    assert_eq!(counts.users, 2);
    assert_eq!(counts.time, 3);
    assert_eq!(counts.songplays, 6);

    // Song data: the first song id already exists.
    let err = process_dataset(&mut warehouse, &data.song_root, Dataset::Songs).unwrap_err();
    assert!(format!("{:#}", err).contains("TRAAAAA.json"));
    let counts = warehouse.counts().unwrap();
    assert_eq!(counts.artists, 2);
    assert_eq!(counts.songs, 2);
}

#[test]
fn test_malformed_log_stops_the_run_after_committed_files() {
    let data = TestData::new();
    data.write_log(
        "a.json",
        &[log_line("NextSong", TS_1, "8", "free", Some(("T", "X", 200.0)))],
    );
    data.write_log(
        "b.json",
        &[
            log_line("NextSong", TS_2, "9", "free", Some(("T", "X", 200.0))),
            r#"{"page": "NextSong", "ts": 1541122543796}"#.to_string(),
        ],
    );
    data.write_log(
        "c.json",
        &[log_line("NextSong", TS_3, "7", "free", Some(("T", "X", 200.0)))],
    );
    let mut warehouse = data.open_warehouse();

    let err = process_dataset(&mut warehouse, &data.log_root, Dataset::Logs).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RecordError>(),
        Some(RecordError::MalformedRecord { line: 2, .. })
    ));
    assert_eq!(
        data.query_strings(&warehouse, "SELECT user_id FROM users"),
        vec![vec!["8"]]
    );
    assert_eq!(warehouse.counts().unwrap().songplays, 1);
}

#[test]
fn test_hidden_resource_fork_files_are_not_loaded() {
    let data = TestData::new();
    let song = data.write_song("A/A/A/TRAAAAA.json", SONG_A1_S1);
    std::fs::write(
        song.with_file_name("._TRAAAAA.json"),
        [0x00_u8, 0x05, 0x16, 0x07, 0x00, 0x02],
    )
    .unwrap();
    let mut warehouse = data.open_warehouse();

    let summary = process_dataset(&mut warehouse, &data.song_root, Dataset::Songs).unwrap();

    assert_eq!(summary.files_found, 1);
    assert_eq!(warehouse.counts().unwrap().songs, 1);
}

#[cfg(unix)]
#[test]
fn test_symlinked_song_file_is_loaded() {
    let data = TestData::new();
    let outside = tempfile::TempDir::new().unwrap();
    let target = outside.path().join("TRABCDE.json");
    std::fs::write(&target, SONG_A2_S2).unwrap();
    data.write_song("A/A/A/TRAAAAA.json", SONG_A1_S1);
    std::os::unix::fs::symlink(&target, data.song_root.join("A/A/A/TRABCDE.json")).unwrap();
    let mut warehouse = data.open_warehouse();

    let summary = process_dataset(&mut warehouse, &data.song_root, Dataset::Songs).unwrap();

    assert_eq!(summary.files_processed, 2);
    assert_eq!(
        data.query_strings(&warehouse, "SELECT song_id FROM songs ORDER BY song_id"),
        vec![vec!["S1"], vec!["S2"]]
    );
}

#[test]
fn test_missing_data_directory_is_fatal() {
    let data = TestData::new();
    let mut warehouse = data.open_warehouse();

    let missing = data.song_root.join("does-not-exist");
    let err = process_dataset(&mut warehouse, &missing, Dataset::Songs).unwrap_err();
    assert!(format!("{:#}", err).contains("does-not-exist"));
}

#[test]
fn test_database_survives_reopen() {
    let data = TestData::new();
    write_sample_inputs(&data);
    {
        let mut warehouse = data.open_warehouse();
        load_all(&data, &mut warehouse).unwrap();
    }

    let warehouse = data.open_warehouse();
    assert_eq!(warehouse.counts().unwrap().songplays, 3);
}
