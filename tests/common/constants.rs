//! Records shared by the end-to-end tests.

pub const SONG_A1_S1: &str = r#"{"num_songs":1,"artist_id":"A1","artist_name":"X","artist_location":"NY","artist_latitude":null,"artist_longitude":null,"song_id":"S1","title":"T","year":2000,"duration":200.0}"#;

pub const SONG_A2_S2: &str = r#"{"num_songs":1,"artist_id":"A2","artist_name":"name","artist_location":"","artist_latitude":35.14968,"artist_longitude":-90.04892,"song_id":"S2","title":"title","year":0,"duration":1.0}"#;

pub const TS_1: i64 = 1541121934796;
pub const TS_2: i64 = 1541122241796;
pub const TS_3: i64 = 1541122543796;
