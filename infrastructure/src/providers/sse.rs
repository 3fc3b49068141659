//! Incremental decoder for `text/event-stream` response bodies.
//!
//! Network chunks do not line up with events (or even with UTF-8 character
//! boundaries), so raw bytes are buffered until a blank line closes an event.

/// Buffers raw body bytes and emits the `data` payload of each complete event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a body chunk, returning the payloads of all events it completes.
    ///
    /// Events without any `data:` line (comments, keep-alives) are dropped.
    /// Multiple `data:` lines in one event are joined with `\n`.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        // CR never appears inside a multi-byte UTF-8 sequence, so stripping it
        // byte-wise is safe and turns CRLF framing into LF framing.
        self.pending
            .extend(bytes.iter().copied().filter(|b| *b != b'\r'));

        let mut payloads = Vec::new();
        while let Some(end) = find_event_end(&self.pending) {
            let block: Vec<u8> = self.pending.drain(..end + 2).collect();
            if let Some(data) = event_data(&block[..end]) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// Flush a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Option<String> {
        let block = std::mem::take(&mut self.pending);
        event_data(&block)
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn event_data(block: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(block);
    let mut data: Option<String> = None;
    for line in text.lines() {
        let Some(rest) = line.strip_prefix("data:") else {
            continue;
        };
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        match data.as_mut() {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(rest);
            }
            None => data = Some(rest.to_string()),
        }
    }
    data
}
