use std::io::BufRead;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::{DashError, DashResult};

/// One dispatched Server-Sent-Events message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    pub event: Option<String>,
    pub id: Option<String>,
    pub data: String,
}

/// Line-oriented SSE decoder.
///
/// Feed lines without their terminator; a blank line dispatches the
/// accumulated message. Comment lines (`:`) are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: Option<String>,
    id: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) -> Option<SseMessage> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data.push(value.to_owned()),
            "event" => self.event = Some(value.to_owned()),
            "id" => self.id = Some(value.to_owned()),
            _ => trace!(field, "ignoring unknown sse field"),
        }
        None
    }

    /// End of stream. A message without its terminating blank line is
    /// incomplete and is dropped, never dispatched.
    pub fn finish(&mut self) {
        self.event = None;
        let dropped = std::mem::take(&mut self.data);
        if !dropped.is_empty() {
            debug!(lines = dropped.len(), "discarding unterminated sse message");
        }
    }

    fn dispatch(&mut self) -> Option<SseMessage> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseMessage {
            event,
            id: self.id.clone(),
            data,
        })
    }
}

/// One alert row pushed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub ticker: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of one `/alerts/stream` message; replaces the client alert set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFrame {
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub timestamp: Value,
}

impl AlertFrame {
    pub fn from_message(message: &SseMessage) -> DashResult<Self> {
        serde_json::from_str(&message.data)
            .map_err(|e| DashError::Stream(format!("invalid alert frame: {e}")))
    }
}

/// Iterator of alert frames over an SSE byte stream.
///
/// Ends when the server closes the stream; I/O errors end the iteration
/// after being yielded once.
pub struct AlertStream<R> {
    reader: R,
    decoder: SseDecoder,
    line: String,
    done: bool,
}

impl<R: BufRead> AlertStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: SseDecoder::new(),
            line: String::new(),
            done: false,
        }
    }

    fn next_message(&mut self) -> DashResult<Option<SseMessage>> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .map_err(|e| DashError::Stream(e.to_string()))?;
            if read == 0 {
                self.decoder.finish();
                return Ok(None);
            }
            let line = self.line.trim_end_matches('\n');
            if let Some(message) = self.decoder.push_line(line) {
                return Ok(Some(message));
            }
        }
    }
}

impl<R: BufRead> Iterator for AlertStream<R> {
    type Item = DashResult<AlertFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.next_message() {
                Ok(Some(message)) => {
                    if message.event.as_deref().is_some_and(|event| event != "message") {
                        trace!(event = ?message.event, "skipping non-alert sse event");
                        continue;
                    }
                    return Some(AlertFrame::from_message(&message));
                }
                Ok(None) => self.done = true,
                Err(err) => {
                    warn!(error = %err, "alert stream failed");
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
