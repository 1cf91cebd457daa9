//! Newline-delimited JSON reading.

use super::RecordError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

/// One parsed line of an input file. `line` is 1-based.
#[derive(Debug)]
pub struct JsonLine {
    pub line: usize,
    pub value: Value,
}

impl JsonLine {
    /// Decode this line into a typed record, reporting missing or mistyped
    /// fields as `RecordError::MalformedRecord`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        T::deserialize(&self.value).map_err(|e| RecordError::MalformedRecord {
            line: self.line,
            reason: e.to_string(),
        })
    }
}

/// Parse every non-blank line of `text` as a standalone JSON value.
pub fn parse_json_lines(text: &str) -> Result<Vec<JsonLine>, RecordError> {
    text.lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(index, raw)| {
            serde_json::from_str(raw)
                .map(|value| JsonLine {
                    line: index + 1,
                    value,
                })
                .map_err(|source| RecordError::MalformedJson {
                    line: index + 1,
                    source,
                })
        })
        .collect()
}

pub fn read_json_lines(path: &Path) -> Result<Vec<JsonLine>, RecordError> {
    let text = std::fs::read_to_string(path)?;
    parse_json_lines(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Pair {
        a: i64,
        b: String,
    }

    #[test]
    fn test_parses_each_line_and_skips_blanks() {
        let text = "{\"a\": 1, \"b\": \"x\"}\n\n   \n{\"a\": 2, \"b\": \"y\"}\r\n";
        let lines = parse_json_lines(text).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[1].line, 4);
        assert_eq!(
            lines[1].decode::<Pair>().unwrap(),
            Pair {
                a: 2,
                b: "y".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_json_reports_line() {
        let text = "{\"a\": 1, \"b\": \"x\"}\n{\"a\": 2,";
        match parse_json_lines(text) {
            Err(RecordError::MalformedJson { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_malformed_record() {
        let lines = parse_json_lines("{\"a\": 1}").unwrap();
        match lines[0].decode::<Pair>() {
            Err(RecordError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 1);
                assert!(reason.contains("b"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(parse_json_lines("").unwrap().is_empty());
    }
}
