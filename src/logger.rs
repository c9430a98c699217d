use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

/// Append-only JSON-lines log of every exchange with the controller.
/// Mainly a protocol-debugging aid; the XML bodies are logged verbatim.
pub(crate) struct MessageLogger {
    file: File,
}

impl MessageLogger {
    pub fn new(path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    pub fn log_read(&mut self, path: &str, body: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "path": path,
            "body": body,
        });
        self.write_line(&entry);
    }

    pub fn log_response(&mut self, status: u16, body: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "resp",
            "status": status,
            "body": body,
        });
        self.write_line(&entry);
    }

    pub fn log_write(&mut self, payload: &str, ok: bool) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "write",
            "payload": payload,
            "ok": ok,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Err(e) = writeln!(self.file, "{entry}") {
            warn!(error = %e, "failed to write message log entry");
        }
    }
}
