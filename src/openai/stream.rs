//! Server-sent-event decoding for streamed chat completions.
//!
//! The body arrives in arbitrary network chunks. Frames are newline-delimited
//! `data: <json>` lines and may be split across chunks, so bytes are buffered
//! until a full line is available.

use serde::Deserialize;
use tracing::debug;

/// One decoded SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Payload of a `data:` line.
    Data(String),
    /// The `data: [DONE]` terminator.
    Done,
}

/// Incremental line decoder for an SSE body.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every frame completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Decode whatever is left once the body has ended without a trailing newline.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        parse_line(&rest)
    }
}

fn parse_line(line: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    let data = line.strip_prefix("data:")?.trim_start();

    if data == "[DONE]" {
        Some(SseEvent::Done)
    } else {
        Some(SseEvent::Data(data.to_string()))
    }
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Extract `choices[0].delta.content` from a streamed chunk.
pub fn parse_delta(data: &str) -> Result<Option<String>, serde_json::Error> {
    let chunk: ChatChunk = serde_json::from_str(data)?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content))
}

/// Collects streamed deltas into the full response and a one-line display text.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    full: String,
    display: String,
    done: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame. Returns the cumulative display text when the frame
    /// carried new content, `None` otherwise.
    ///
    /// Frames with malformed JSON are skipped rather than aborting the stream.
    pub fn push(&mut self, event: SseEvent) -> Option<&str> {
        if self.done {
            return None;
        }

        let data = match event {
            SseEvent::Done => {
                self.done = true;
                return None;
            }
            SseEvent::Data(data) => data,
        };

        match parse_delta(&data) {
            Ok(Some(content)) if !content.is_empty() => {
                self.full.push_str(&content);
                self.display.push_str(&content.replace('\n', " "));
                Some(&self.display)
            }
            Ok(_) => None,
            Err(e) => {
                debug!("Skipping malformed SSE frame ({}): {}", e, data);
                None
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn full(&self) -> &str {
        &self.full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(content: &str) -> String {
        let payload = serde_json::json!({ "choices": [{ "delta": { "content": content } }] });
        format!("data: {}\n", payload)
    }

    #[test]
    fn test_decoder_splits_lines() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: {\"a\":1}\n\ndata: [DONE]\n");
        assert_eq!(
            events,
            vec![SseEvent::Data("{\"a\":1}".to_string()), SseEvent::Done]
        );
    }

    #[test]
    fn test_decoder_reassembles_frames_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"choi").is_empty());
        let events = decoder.push(b"ces\":[]}\r\n");
        assert_eq!(events, vec![SseEvent::Data("{\"choices\":[]}".to_string())]);
    }

    #[test]
    fn test_decoder_reassembles_split_utf8() {
        let line = frame("日本語");
        let bytes = line.as_bytes();
        // Split inside the multi-byte sequence of the first character.
        let split = line.find('日').unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&bytes[..split]).is_empty());
        let events = decoder.push(&bytes[split..]);

        let SseEvent::Data(data) = &events[0] else {
            panic!("expected data frame");
        };
        assert_eq!(parse_delta(data).unwrap().as_deref(), Some("日本語"));
    }

    #[test]
    fn test_decoder_ignores_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\nevent: message\nid: 3\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_decoder_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: [DONE]").is_empty());
        assert_eq!(decoder.finish(), Some(SseEvent::Done));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_parse_delta_without_content() {
        let role_only = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_delta(role_only).unwrap(), None);
        assert_eq!(parse_delta(r#"{"choices":[]}"#).unwrap(), None);
    }

    #[test]
    fn test_accumulator_flattens_newlines_for_display() {
        let mut acc = StreamAccumulator::new();
        let first = frame("feat: ");
        let second = frame("add x\n```\nfeat: add x\n```");

        let mut decoder = SseDecoder::new();
        let mut displays = Vec::new();
        for event in decoder.push(format!("{first}{second}data: [DONE]\n").as_bytes()) {
            if let Some(display) = acc.push(event) {
                displays.push(display.to_string());
            }
        }

        assert!(acc.is_done());
        assert_eq!(displays, vec!["feat: ", "feat: add x ``` feat: add x ```"]);
        assert_eq!(acc.full(), "feat: add x\n```\nfeat: add x\n```");
    }

    #[test]
    fn test_accumulator_skips_malformed_frames() {
        let mut acc = StreamAccumulator::new();
        assert!(acc.push(SseEvent::Data("{not json".to_string())).is_none());
        assert_eq!(
            acc.push(SseEvent::Data(
                r#"{"choices":[{"delta":{"content":"ok"}}]}"#.to_string()
            )),
            Some("ok")
        );
        assert!(!acc.is_done());
    }

    #[test]
    fn test_accumulator_ignores_frames_after_done() {
        let mut acc = StreamAccumulator::new();
        acc.push(SseEvent::Done);
        assert!(acc.push(SseEvent::Data(frame("late").trim_start_matches("data: ").to_string())).is_none());
        assert_eq!(acc.full(), "");
    }
}
