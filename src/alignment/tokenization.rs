use crate::types::{ParsedPair, RecordIds};

const PAIR_DELIMITER: &str = "|||";
const BYTE_ORDER_MARK: char = '\u{feff}';

pub fn tokenize_whitespace(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Parse a `source ||| target` line.
///
/// Returns `None` when the delimiter is missing or either side has no tokens.
pub fn parse_pair_line(line: &str, tokenize: impl Fn(&str) -> Vec<String>) -> Option<ParsedPair> {
    let line = line.trim_end_matches(['\n', '\r']);
    let (left, right) = line.split_once(PAIR_DELIMITER)?;
    build_pair(left.trim(), right.trim(), None, tokenize)
}

/// Parse a `sourceId \t sourceText \t targetId \t targetText` line.
///
/// Extra columns are ignored. Lines with fewer than four columns, non-integer
/// ids or an empty side are rejected.
pub fn parse_tsv_line(line: &str, tokenize: impl Fn(&str) -> Vec<String>) -> Option<ParsedPair> {
    let line = line.trim_end_matches(['\n', '\r']);
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 4 {
        return None;
    }
    let source_id = cols[0]
        .trim_start_matches(BYTE_ORDER_MARK)
        .trim()
        .parse::<i64>()
        .ok()?;
    let target_id = cols[2].trim().parse::<i64>().ok()?;
    build_pair(
        cols[1].trim(),
        cols[3].trim(),
        Some(RecordIds::new(source_id, target_id)),
        tokenize,
    )
}

fn build_pair(
    source_text: &str,
    target_text: &str,
    inline_ids: Option<RecordIds>,
    tokenize: impl Fn(&str) -> Vec<String>,
) -> Option<ParsedPair> {
    let source_tokens = tokenize(source_text);
    let target_tokens = tokenize(target_text);
    if source_tokens.is_empty() || target_tokens.is_empty() {
        return None;
    }
    Some(ParsedPair {
        source_text: source_text.to_string(),
        target_text: target_text.to_string(),
        source_tokens,
        target_tokens,
        inline_ids,
    })
}
