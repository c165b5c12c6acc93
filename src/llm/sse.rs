// src/llm/sse.rs
// Incremental Server-Sent-Events parser over a raw byte stream.
//
// Network chunks can split a multi-byte UTF-8 sequence or an SSE field at any
// byte, so decoding state is carried across feed() calls: undecodable tail
// bytes wait for the next chunk instead of turning into replacement
// characters. Frames are delimited by a blank line; a trailing frame that
// never sees its blank line is dropped when the parser is dropped.

/// Stateful byte-chunk → SSE data-line parser.
#[derive(Debug, Default)]
pub struct EventParser {
    /// Undecoded bytes — at most one incomplete UTF-8 sequence.
    bytes: Vec<u8>,
    /// Decoded text not yet terminated by a frame boundary.
    text: String,
    /// A chunk ended in '\r'; hold it until we can see whether '\n' follows.
    held_cr: bool,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning the data lines of every frame the
    /// chunk completes, in arrival order. Each line of a multi-line `data:`
    /// field is returned separately; comment lines and non-data fields are
    /// dropped; a frame with no data yields nothing.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let decoded = self.decode(chunk);
        self.push_normalized(&decoded);

        let mut out = Vec::new();
        while let Some(pos) = self.text.find("\n\n") {
            let frame: String = self.text.drain(..pos + 2).collect();
            parse_frame(&frame, &mut out);
        }
        out
    }

    /// Decode as much of the buffered bytes as possible, keeping an
    /// incomplete trailing sequence for the next call.
    fn decode(&mut self, chunk: &[u8]) -> String {
        self.bytes.extend_from_slice(chunk);
        let mut decoded = String::new();

        loop {
            match std::str::from_utf8(&self.bytes) {
                Ok(s) => {
                    decoded.push_str(s);
                    self.bytes.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    decoded.push_str(std::str::from_utf8(&self.bytes[..valid]).unwrap_or(""));
                    match e.error_len() {
                        // Incomplete sequence at the tail: wait for more bytes.
                        None => {
                            self.bytes.drain(..valid);
                            break;
                        }
                        // Genuinely invalid bytes: replace and move on.
                        Some(len) => {
                            decoded.push(char::REPLACEMENT_CHARACTER);
                            self.bytes.drain(..valid + len);
                        }
                    }
                }
            }
        }
        decoded
    }

    /// Append decoded text with line endings normalized to '\n'. A trailing
    /// '\r' is withheld until the next chunk decides whether it was CRLF.
    fn push_normalized(&mut self, decoded: &str) {
        let mut s = String::with_capacity(decoded.len() + 1);
        if self.held_cr {
            s.push('\r');
            self.held_cr = false;
        }
        s.push_str(decoded);
        if s.ends_with('\r') {
            s.pop();
            self.held_cr = true;
        }
        let s = s.replace("\r\n", "\n").replace('\r', "\n");
        self.text.push_str(&s);
    }

    /// Whether an unterminated frame is still buffered. At end of stream such
    /// a frame is discarded, never emitted.
    pub fn has_partial(&self) -> bool {
        !self.text.is_empty() || !self.bytes.is_empty() || self.held_cr
    }
}

fn parse_frame(frame: &str, out: &mut Vec<String>) {
    for line in frame.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let Some(rest) = line.strip_prefix("data:") else {
            continue; // event:, id:, retry:, unknown fields
        };
        let data = rest.strip_prefix(' ').unwrap_or(rest);
        if !data.is_empty() {
            out.push(data.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut EventParser, chunks: &[&[u8]]) -> Vec<String> {
        chunks.iter().flat_map(|c| parser.feed(c)).collect()
    }

    #[test]
    fn test_single_frame() {
        let mut p = EventParser::new();
        let lines = p.feed(b"data: {\"a\":1}\n\n");
        assert_eq!(lines, vec!["{\"a\":1}"]);
        assert!(!p.has_partial());
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut p = EventParser::new();
        let lines = feed_all(&mut p, &[b"data: {\"a\"", b":1}\n", b"\ndata: x\n\n"]);
        assert_eq!(lines, vec!["{\"a\":1}", "x"]);
    }

    #[test]
    fn test_multibyte_utf8_split_at_chunk_boundary() {
        // "空调" encodes to six bytes; cut inside the second character.
        let text = "data: 空调\n\n".as_bytes();
        for cut in 1..text.len() {
            let mut p = EventParser::new();
            let lines = feed_all(&mut p, &[&text[..cut], &text[cut..]]);
            assert_eq!(lines, vec!["空调"], "failed at cut {cut}");
        }
    }

    #[test]
    fn test_multiline_data_delivered_per_line() {
        let mut p = EventParser::new();
        let lines = p.feed(b"data: first\ndata: second\n\n");
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_comments_and_other_fields_ignored() {
        let mut p = EventParser::new();
        let lines = p.feed(b": heartbeat\nevent: message\nid: 7\nretry: 100\ndata: d\n\n");
        assert_eq!(lines, vec!["d"]);
    }

    #[test]
    fn test_empty_data_produces_nothing() {
        let mut p = EventParser::new();
        assert!(p.feed(b"data:\n\n").is_empty());
        assert!(p.feed(b"event: ping\n\n").is_empty());
    }

    #[test]
    fn test_incomplete_trailing_frame_is_not_emitted() {
        let mut p = EventParser::new();
        assert!(p.feed(b"data: never-terminated").is_empty());
        assert!(p.has_partial());
        // Dropping the parser discards it; nothing was delivered.
    }

    #[test]
    fn test_crlf_framing() {
        let mut p = EventParser::new();
        let lines = p.feed(b"data: a\r\n\r\ndata: b\r\n\r\n");
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_crlf_split_between_cr_and_lf() {
        let mut p = EventParser::new();
        let lines = feed_all(&mut p, &[b"data: a\r", b"\n\r", b"\n"]);
        assert_eq!(lines, vec!["a"]);
    }

    #[test]
    fn test_invalid_bytes_become_replacement_char() {
        let mut p = EventParser::new();
        let lines = p.feed(b"data: a\xFFb\n\n");
        assert_eq!(lines, vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn test_byte_at_a_time_delivery() {
        let text = "data: {\"choices\":[{\"delta\":{\"content\":\"你好\"}}]}\n\n".as_bytes();
        let mut p = EventParser::new();
        let mut lines = Vec::new();
        for b in text {
            lines.extend(p.feed(std::slice::from_ref(b)));
        }
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("你好"));
    }
}
