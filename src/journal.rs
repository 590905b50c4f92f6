//! Journal entries as emitted by `journalctl -o json`

use std::fmt;

use chrono::DateTime;
use serde_json::{Map, Value};

/// Field carrying the wall-clock time, microseconds since the epoch as a string
pub const REALTIME_TIMESTAMP: &str = "__REALTIME_TIMESTAMP";
pub const SYSLOG_IDENTIFIER: &str = "SYSLOG_IDENTIFIER";
pub const MESSAGE: &str = "MESSAGE";

/// One journal record: field name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEntry(pub Map<String, Value>);

impl LogEntry {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    fn str_field(&self, field: &str) -> &str {
        self.0.get(field).and_then(Value::as_str).unwrap_or("-")
    }

    fn timestamp(&self) -> String {
        let raw = match self.0.get(REALTIME_TIMESTAMP) {
            None => return "-(no timestamp!)-".to_string(),
            Some(Value::String(s)) => s,
            Some(other) => return format!("-(timestamp not a string: {})-", other),
        };

        let micros = match raw.parse::<i64>() {
            Ok(us) => us,
            Err(_) => return format!("-(timestamp not a decimal number: {:?})-", raw),
        };

        match DateTime::from_timestamp_micros(micros) {
            Some(t) => t.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            None => format!("-(timestamp out of range: {:?})-", raw),
        }
    }
}

impl From<Map<String, Value>> for LogEntry {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp(),
            self.str_field(SYSLOG_IDENTIFIER),
            self.str_field(MESSAGE)
        )
    }
}

/// Decode one JSON object per line, in order
///
/// Blank lines are skipped. The first malformed line aborts the whole decode;
/// the error carries its 1-based line number.
pub fn decode_entries(raw: &[u8]) -> Result<Vec<LogEntry>, (usize, serde_json::Error)> {
    let mut entries = Vec::new();

    for (i, line) in raw.split(|b| *b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let fields: Map<String, Value> = serde_json::from_slice(line).map_err(|e| (i + 1, e))?;
        entries.push(LogEntry(fields));
    }

    Ok(entries)
}
