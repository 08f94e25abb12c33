use std::io::BufRead;

use crate::alignment::edges::parse_edge_line;
use crate::error::GroupingError;
use crate::types::{AlignmentEdge, RecordIds};

/// Any buffered line source: a file, stdin, or an in-memory cursor.
pub type LineSource = Box<dyn BufRead>;

/// Reads `\n`-terminated lines, replacing invalid UTF-8 instead of failing.
pub(crate) struct LineReader {
    reader: LineSource,
    buf: Vec<u8>,
}

impl LineReader {
    pub(crate) fn new(reader: LineSource) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    pub(crate) fn next_line(
        &mut self,
        context: &'static str,
    ) -> Result<Option<String>, GroupingError> {
        self.buf.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| GroupingError::io(context, e))?;
        if n == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&self.buf).into_owned();
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Positional alignment-edge stream: one line per primary line.
pub struct EdgeStream {
    lines: LineReader,
    consumed: usize,
    exhausted: bool,
}

impl EdgeStream {
    pub fn new(reader: LineSource) -> Self {
        Self {
            lines: LineReader::new(reader),
            consumed: 0,
            exhausted: false,
        }
    }

    /// Take the next entry. Once the stream runs out it stays exhausted and
    /// every later call returns `None`.
    pub fn advance(&mut self) -> Result<Option<Vec<AlignmentEdge>>, GroupingError> {
        if self.exhausted {
            return Ok(None);
        }
        match self.lines.next_line("read alignment stream")? {
            Some(line) => {
                self.consumed += 1;
                Ok(Some(parse_edge_line(&line)))
            }
            None => {
                self.exhausted = true;
                tracing::warn!(
                    entries = self.consumed,
                    "alignment stream exhausted; remaining lines have no edges"
                );
                Ok(None)
            }
        }
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Positional id side-channel: one JSON object per non-blank line.
///
/// A line that is not a JSON object still counts as an entry, with no ids.
pub struct MetadataStream {
    lines: LineReader,
    consumed: usize,
    exhausted: bool,
}

impl MetadataStream {
    pub fn new(reader: LineSource) -> Self {
        Self {
            lines: LineReader::new(reader),
            consumed: 0,
            exhausted: false,
        }
    }

    pub fn advance(&mut self) -> Result<Option<RecordIds>, GroupingError> {
        if self.exhausted {
            return Ok(None);
        }
        while let Some(line) = self.lines.next_line("read metadata stream")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.consumed += 1;
            return Ok(Some(parse_metadata_line(line)));
        }
        self.exhausted = true;
        tracing::warn!(
            entries = self.consumed,
            "metadata stream exhausted; remaining records have no ids"
        );
        Ok(None)
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

const SOURCE_ID_KEYS: [&str; 2] = ["sp_id", "sourceId"];
const TARGET_ID_KEYS: [&str; 2] = ["en_id", "targetId"];

/// Parse `{"sp_id": 1, "en_id": 2}` (or `sourceId`/`targetId`). Ids may be
/// integers, whole-valued floats or integer strings; anything else is
/// treated as absent.
pub fn parse_metadata_line(line: &str) -> RecordIds {
    let Ok(serde_json::Value::Object(obj)) = serde_json::from_str::<serde_json::Value>(line) else {
        tracing::debug!(line, "metadata: unparseable entry");
        return RecordIds::default();
    };
    let id_for = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| obj.get(*key))
            .and_then(json_to_id)
    };
    RecordIds {
        source_id: id_for(&SOURCE_ID_KEYS[..]),
        target_id: id_for(&TARGET_ID_KEYS[..]),
    }
}

fn json_to_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn source(text: &str) -> LineSource {
        Box::new(Cursor::new(text.to_string().into_bytes()))
    }

    #[test]
    fn line_reader_strips_line_endings_and_replaces_bad_utf8() {
        let mut bytes = b"uno\r\ndos\n".to_vec();
        bytes.extend_from_slice(&[0xff, b'x']);
        let mut reader = LineReader::new(Box::new(Cursor::new(bytes)));
        assert_eq!(reader.next_line("t").unwrap().as_deref(), Some("uno"));
        assert_eq!(reader.next_line("t").unwrap().as_deref(), Some("dos"));
        assert_eq!(reader.next_line("t").unwrap().as_deref(), Some("\u{fffd}x"));
        assert_eq!(reader.next_line("t").unwrap(), None);
    }

    #[test]
    fn edge_stream_counts_blank_lines_as_entries() {
        let mut stream = EdgeStream::new(source("0-0\n\n1-1\n"));
        assert_eq!(stream.advance().unwrap(), Some(vec![AlignmentEdge::new(0, 0)]));
        assert_eq!(stream.advance().unwrap(), Some(Vec::new()));
        assert_eq!(stream.advance().unwrap(), Some(vec![AlignmentEdge::new(1, 1)]));
        assert_eq!(stream.advance().unwrap(), None);
        assert_eq!(stream.advance().unwrap(), None);
        assert_eq!(stream.consumed(), 3);
    }

    #[test]
    fn metadata_stream_skips_blank_lines_but_keeps_bad_entries() {
        let mut stream = MetadataStream::new(source(
            "{\"sp_id\": 1, \"en_id\": 2}\n\nnot json\n{\"sourceId\": \"3\", \"targetId\": 4}\n",
        ));
        assert_eq!(stream.advance().unwrap(), Some(RecordIds::new(1, 2)));
        assert_eq!(stream.advance().unwrap(), Some(RecordIds::default()));
        assert_eq!(stream.advance().unwrap(), Some(RecordIds::new(3, 4)));
        assert_eq!(stream.advance().unwrap(), None);
        assert_eq!(stream.consumed(), 3);
    }

    #[test]
    fn parse_metadata_line_handles_partial_ids() {
        assert_eq!(
            parse_metadata_line(r#"{"sp_id": 7}"#),
            RecordIds {
                source_id: Some(7),
                target_id: None
            }
        );
        assert_eq!(
            parse_metadata_line(r#"{"sp_id": 1.5, "en_id": null}"#),
            RecordIds::default()
        );
        assert_eq!(parse_metadata_line("[1, 2]"), RecordIds::default());
        assert_eq!(
            parse_metadata_line(r#"{"sp_id": 2483.0, "en_id": 1.6492e4}"#),
            RecordIds::new(2483, 16492)
        );
    }
}
