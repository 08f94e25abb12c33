//! Conversion of a four-column TSV table into the inputs of the edge-file
//! pipeline: a `source ||| target` pairs file for the external aligner, and
//! a metadata sidecar with one `{"sp_id", "en_id"}` object per written pair.

use std::io::{BufRead, Write};

use serde::Serialize;

use crate::alignment::tokenization::{parse_tsv_line, tokenize_whitespace};
use crate::error::GroupingError;
use crate::pipeline::streams::LineReader;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepareSummary {
    pub lines_read: usize,
    pub written: usize,
    /// Rows dropped for missing columns, bad ids or an empty side.
    pub skipped: usize,
}

#[derive(Serialize)]
struct MetaEntry {
    sp_id: i64,
    en_id: i64,
}

/// Convert TSV rows until the input ends or `limit` physical lines were read.
///
/// Every written pair line has exactly one metadata line, so the two outputs
/// stay positionally aligned.
pub fn convert_tsv<R, P, M>(
    input: R,
    pairs_out: &mut P,
    mut meta_out: Option<&mut M>,
    limit: Option<usize>,
) -> Result<PrepareSummary, GroupingError>
where
    R: BufRead + 'static,
    P: Write,
    M: Write,
{
    let mut lines = LineReader::new(Box::new(input));
    let mut summary = PrepareSummary::default();

    while limit.map_or(true, |max| summary.lines_read < max) {
        let Some(line) = lines.next_line("read tsv input")? else {
            break;
        };
        summary.lines_read += 1;
        if line.trim().is_empty() {
            continue;
        }
        let Some(pair) = parse_tsv_line(&line, tokenize_whitespace) else {
            summary.skipped += 1;
            continue;
        };
        let ids = pair.inline_ids.unwrap_or_default();
        let (Some(sp_id), Some(en_id)) = (ids.source_id, ids.target_id) else {
            summary.skipped += 1;
            continue;
        };

        writeln!(
            pairs_out,
            "{} ||| {}",
            pair.source_tokens.join(" "),
            pair.target_tokens.join(" ")
        )
        .map_err(|e| GroupingError::io("write pairs file", e))?;
        if let Some(meta) = meta_out.as_deref_mut() {
            serde_json::to_writer(&mut *meta, &MetaEntry { sp_id, en_id })
                .map_err(|e| GroupingError::json("serialize metadata entry", e))?;
            meta.write_all(b"\n")
                .map_err(|e| GroupingError::io("write metadata file", e))?;
        }
        summary.written += 1;
    }

    pairs_out
        .flush()
        .map_err(|e| GroupingError::io("flush pairs file", e))?;
    if let Some(meta) = meta_out {
        meta.flush()
            .map_err(|e| GroupingError::io("flush metadata file", e))?;
    }
    tracing::info!(
        lines_read = summary.lines_read,
        written = summary.written,
        skipped = summary.skipped,
        "tsv conversion complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::pipeline::streams::parse_metadata_line;
    use crate::types::RecordIds;

    const TSV: &str = "\u{feff}1\tHola   mundo\t10\tHello world\n\
                       2\tsolo dos columnas\n\
                       \n\
                       x\tmal\t20\tbad\n\
                       3\t¿Qué  estás haciendo?\t30\tWhat are you doing?\n";

    #[test]
    fn convert_writes_normalized_pairs_and_matching_meta() {
        let mut pairs = Vec::new();
        let mut meta = Vec::new();
        let summary = convert_tsv(
            Cursor::new(TSV.as_bytes().to_vec()),
            &mut pairs,
            Some(&mut meta),
            None,
        )
        .expect("convert");

        assert_eq!(
            summary,
            PrepareSummary {
                lines_read: 5,
                written: 2,
                skipped: 2,
            }
        );
        let pairs = String::from_utf8(pairs).unwrap();
        assert_eq!(
            pairs,
            "Hola mundo ||| Hello world\n¿Qué estás haciendo? ||| What are you doing?\n"
        );
        let ids: Vec<RecordIds> = String::from_utf8(meta)
            .unwrap()
            .lines()
            .map(parse_metadata_line)
            .collect();
        assert_eq!(ids, vec![RecordIds::new(1, 10), RecordIds::new(3, 30)]);
    }

    #[test]
    fn convert_respects_limit_and_no_meta() {
        let mut pairs = Vec::new();
        let summary = convert_tsv::<_, _, Vec<u8>>(
            Cursor::new(TSV.as_bytes().to_vec()),
            &mut pairs,
            None,
            Some(2),
        )
        .expect("convert");
        assert_eq!(summary.lines_read, 2);
        assert_eq!(summary.written, 1);
        assert_eq!(String::from_utf8(pairs).unwrap().lines().count(), 1);
    }
}
