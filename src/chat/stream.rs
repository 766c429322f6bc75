// chat/stream.rs

use serde_json::Value;

/// JSON pointer to the reply text inside one streamed frame
const FRAGMENT_POINTER: &str = "/candidates/0/content/parts/0/text";

/// Incremental decoder for the chat proxy's server-sent-event stream.
///
/// Bytes arrive in arbitrary chunks: a multi-byte character or a line may be
/// split across two reads. Incomplete UTF-8 sequences and partial lines are
/// held back until the rest arrives.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending_bytes: Vec<u8>,
    line_buffer: String,
}

impl SseDecoder {
    /// Feed one chunk; returns the text fragments completed by it, in order
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode_utf8(chunk);

        let mut fragments = Vec::new();
        while let Some(newline) = self.line_buffer.find('\n') {
            let line: String = self.line_buffer.drain(..=newline).collect();
            if let Some(fragment) = parse_line(&line) {
                fragments.push(fragment);
            }
        }
        fragments
    }

    /// Flush a trailing line that was never newline-terminated
    pub fn finish(&mut self) -> Vec<String> {
        if !self.pending_bytes.is_empty() {
            self.line_buffer
                .push_str(&String::from_utf8_lossy(&self.pending_bytes));
            self.pending_bytes.clear();
        }
        let line = std::mem::take(&mut self.line_buffer);
        parse_line(&line).into_iter().collect()
    }

    fn decode_utf8(&mut self, chunk: &[u8]) {
        self.pending_bytes.extend_from_slice(chunk);

        loop {
            match std::str::from_utf8(&self.pending_bytes) {
                Ok(text) => {
                    self.line_buffer.push_str(text);
                    self.pending_bytes.clear();
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    self.line_buffer
                        .push_str(&String::from_utf8_lossy(&self.pending_bytes[..valid]));
                    match err.error_len() {
                        // Invalid sequence: substitute and keep going
                        Some(bad) => {
                            self.line_buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending_bytes.drain(..valid + bad);
                        }
                        // Truncated sequence: wait for the next chunk
                        None => {
                            self.pending_bytes.drain(..valid);
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Extract the reply text from a single `data:` line.
/// Comments, other fields and frames without text yield nothing.
pub fn parse_line(line: &str) -> Option<String> {
    let line = line.trim_end_matches(['\n', '\r']);
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<Value>(payload) {
        Ok(frame) => frame
            .pointer(FRAGMENT_POINTER)
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(err) => {
            log::debug!("Skipping unparsable chat frame: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
        )
    }

    #[test]
    fn test_parses_data_lines_in_order() {
        let mut decoder = SseDecoder::default();
        let body = format!("{}{}", frame("Hello"), frame(", world"));

        assert_eq!(decoder.push(body.as_bytes()), vec!["Hello", ", world"]);
    }

    #[test]
    fn test_partial_line_waits_for_rest() {
        let mut decoder = SseDecoder::default();
        let body = frame("split");
        let (head, tail) = body.as_bytes().split_at(12);

        assert!(decoder.push(head).is_empty());
        assert_eq!(decoder.push(tail), vec!["split"]);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let mut decoder = SseDecoder::default();
        let body = frame("né");
        let bytes = body.as_bytes();
        // Cut inside the two-byte 'é'
        let cut = body.find('é').map(|i| i + 1).unwrap_or(0);

        assert!(decoder.push(&bytes[..cut]).is_empty());
        assert_eq!(decoder.push(&bytes[cut..]), vec!["né"]);
    }

    #[test]
    fn test_ignores_non_data_and_malformed_lines() {
        let mut decoder = SseDecoder::default();
        let body = format!(
            ": keep-alive\nevent: message\ndata: not json\ndata: {{\"other\":1}}\n{}",
            frame("ok")
        );

        assert_eq!(decoder.push(body.as_bytes()), vec!["ok"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut decoder = SseDecoder::default();
        let body = frame("crlf").replace('\n', "\r\n");

        assert_eq!(decoder.push(body.as_bytes()), vec!["crlf"]);
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::default();
        let body = frame("last");

        assert!(decoder.push(body.trim_end().as_bytes()).is_empty());
        assert_eq!(decoder.finish(), vec!["last"]);
        assert!(decoder.finish().is_empty());
    }
}
