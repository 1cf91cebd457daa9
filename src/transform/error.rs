use thiserror::Error;

/// Errors raised while decoding an input file into typed records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON on line {line}")]
    MalformedJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("File contains no records")]
    Empty,
}
