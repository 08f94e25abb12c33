use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::GroupingError;
use crate::types::SentencePairRecord;

#[derive(Serialize)]
struct ItemsDocument<'a> {
    items: &'a [SentencePairRecord],
}

/// Writes accepted records as JSONL (streamed) or as one `{"items": [...]}`
/// document (buffered until [`RecordWriter::finish`]).
pub struct RecordWriter<W: Write> {
    sink: W,
    format: OutputFormat,
    pending: Vec<SentencePairRecord>,
    written: usize,
}

impl RecordWriter<BufWriter<File>> {
    pub fn create(path: &Path, format: OutputFormat) -> Result<Self, GroupingError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| GroupingError::io("create output directory", e))?;
        }
        let file = File::create(path).map_err(|e| GroupingError::io("create output file", e))?;
        Ok(Self::new(BufWriter::new(file), format))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W, format: OutputFormat) -> Self {
        Self {
            sink,
            format,
            pending: Vec::new(),
            written: 0,
        }
    }

    pub fn write_record(&mut self, record: SentencePairRecord) -> Result<(), GroupingError> {
        match self.format {
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.sink, &record)
                    .map_err(|e| GroupingError::json("serialize record", e))?;
                self.sink
                    .write_all(b"\n")
                    .map_err(|e| GroupingError::io("write record", e))?;
            }
            OutputFormat::JsonDocument => self.pending.push(record),
        }
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush everything and hand back the sink.
    pub fn finish(mut self) -> Result<W, GroupingError> {
        if self.format == OutputFormat::JsonDocument {
            let document = ItemsDocument {
                items: &self.pending,
            };
            serde_json::to_writer_pretty(&mut self.sink, &document)
                .map_err(|e| GroupingError::json("serialize items document", e))?;
            self.sink
                .write_all(b"\n")
                .map_err(|e| GroupingError::io("finalize items document", e))?;
        }
        self.sink
            .flush()
            .map_err(|e| GroupingError::io("flush output", e))?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Group, RecordIds};

    fn record(source: &str, target: &str) -> SentencePairRecord {
        SentencePairRecord::new(
            vec![source.to_string()],
            vec![target.to_string()],
            vec![Group::new(vec![0], vec![0])],
            RecordIds::default(),
        )
    }

    #[test]
    fn json_lines_writes_one_record_per_line() {
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::JsonLines);
        writer.write_record(record("Hola", "Hello")).unwrap();
        writer.write_record(record("Adiós", "Bye")).unwrap();
        assert_eq!(writer.written(), 2);
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            r#"{"es":["Adiós"],"en":["Bye"],"groups":[{"es":[0],"en":[0]}]}"#
        );
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn json_document_wraps_items() {
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::JsonDocument);
        writer.write_record(record("Hola", "Hello")).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert!(out.starts_with("{\n  \"items\": ["));
        assert!(out.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["items"][0]["es"][0], "Hola");
    }

    #[test]
    fn json_document_with_no_records_is_still_valid() {
        let writer = RecordWriter::new(Vec::new(), OutputFormat::JsonDocument);
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["items"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn create_makes_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("out.jsonl");
        let mut writer = RecordWriter::create(&path, OutputFormat::JsonLines).unwrap();
        writer.write_record(record("Hola", "Hello")).unwrap();
        writer.finish().unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 1);
    }
}
