//! Loading artwork records from JSON, JSON Lines, CSV, or plain text.

use serde_json::Value;
use std::fs;
use std::path::Path;

/// Description columns, in the order they are concatenated.
pub const TEXT_COLUMNS: [&str; 4] = ["descr", "descr_en", "descr_clean", "descr_lemmas"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub description: String,
    /// The input row's own cells, in input column order.
    pub columns: Vec<(String, String)>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("no text columns found (expected one of: {})", TEXT_COLUMNS.join(", "))]
    NoTextColumns,
    #[error("record {index}: {reason}")]
    InvalidInput { index: usize, reason: String },
}

/// How an input file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A JSON array, a single object, or JSON Lines.
    Json,
    /// Comma-separated table with a header row.
    Csv,
    /// The whole file is one description.
    Text,
    /// Sniff the content; unparseable JSON-looking text is read as plain text.
    Auto,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json" | "jsonl" | "ndjson") => InputFormat::Json,
            Some("csv") => InputFormat::Csv,
            Some("txt" | "text" | "md") => InputFormat::Text,
            _ => InputFormat::Auto,
        }
    }
}

type Row = Vec<(String, Value)>;

pub fn default_title(index: usize) -> String {
    format!("Item_{index}")
}

pub fn load_records(path: &Path) -> Result<Vec<Record>, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_as(&text, InputFormat::from_path(path))
}

/// Detect the input shape and turn it into records.
///
/// A JSON array or a single JSON object is read as rows; text whose every
/// non-blank line is an object is read as JSON Lines; anything else,
/// including text that only looks like JSON, is one plain-text description.
pub fn parse_records(text: &str) -> Result<Vec<Record>, IngestError> {
    parse_as(text, InputFormat::Auto)
}

pub fn parse_as(text: &str, format: InputFormat) -> Result<Vec<Record>, IngestError> {
    match format {
        InputFormat::Json => rows_to_records(parse_json_rows(text)?),
        InputFormat::Csv => rows_to_records(parse_csv_rows(text)?),
        InputFormat::Text => Ok(plain_text(text)),
        InputFormat::Auto => {
            let trimmed = text.trim_start();
            if !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
                return Ok(plain_text(text));
            }
            match parse_json_rows(text) {
                Ok(rows) => rows_to_records(rows),
                Err(IngestError::Json { .. }) => Ok(plain_text(text)),
                Err(e) => Err(e),
            }
        }
    }
}

fn plain_text(text: &str) -> Vec<Record> {
    vec![Record {
        title: default_title(0),
        description: text.trim().to_string(),
        columns: Vec::new(),
    }]
}

fn object_row(index: usize, value: Value) -> Result<Row, IngestError> {
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(IngestError::InvalidInput {
            index,
            reason: "expected a JSON object".to_string(),
        }),
    }
}

fn parse_json_rows(text: &str) -> Result<Vec<Row>, IngestError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        let value: Value =
            serde_json::from_str(text).map_err(|source| IngestError::Json { line: 1, source })?;
        return match value {
            Value::Array(rows) => rows
                .into_iter()
                .enumerate()
                .map(|(i, row)| object_row(i, row))
                .collect(),
            _ => Err(IngestError::InvalidInput {
                index: 0,
                reason: "top-level JSON must be an array of objects".to_string(),
            }),
        };
    }

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(text) {
        return Ok(vec![object_row(0, value)?]);
    }

    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(line)
            .map_err(|source| IngestError::Json { line: i + 1, source })?;
        rows.push(object_row(rows.len(), value)?);
    }
    Ok(rows)
}

fn parse_csv_rows(text: &str) -> Result<Vec<Row>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, cell)| (h.to_string(), Value::String(cell.to_string())))
                .collect(),
        );
    }
    Ok(rows)
}

fn cell<'a>(row: &'a Row, column: &str) -> Option<&'a Value> {
    row.iter().find(|(k, _)| k == column).map(|(_, v)| v)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Rows share a column set: a column any row carries counts for all of them,
/// missing or null cells reading as empty.
fn rows_to_records(rows: Vec<Row>) -> Result<Vec<Record>, IngestError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let columns: Vec<&str> = TEXT_COLUMNS
        .iter()
        .copied()
        .filter(|col| rows.iter().any(|r| cell(r, col).is_some()))
        .collect();
    if columns.is_empty() {
        return Err(IngestError::NoTextColumns);
    }

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let mut parts = Vec::with_capacity(columns.len());
            for col in &columns {
                let text = match cell(row, col) {
                    None | Some(Value::Null) => "",
                    Some(Value::String(s)) => s.as_str(),
                    Some(_) => {
                        return Err(IngestError::InvalidInput {
                            index,
                            reason: format!("column '{col}' is not a string"),
                        })
                    }
                };
                parts.push(text);
            }

            let title = match cell(row, "title") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => default_title(index),
            };

            Ok(Record {
                title,
                description: parts.join(" ").trim().to_string(),
                columns: row.iter().map(|(k, v)| (k.clone(), cell_text(v))).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_array_joins_present_columns() {
        let input = r#"[
            {"title": "Рой", "descr": "роевой разум", "descr_en": "swarm mind"},
            {"descr_en": "only english"}
        ]"#;
        let records = parse_records(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Рой");
        assert_eq!(records[0].description, "роевой разум swarm mind");
        assert_eq!(records[1].title, "Item_1");
        assert_eq!(records[1].description, "only english");
    }

    #[test]
    fn null_cells_read_as_empty() {
        let input = r#"[{"descr": null, "descr_clean": "  текст  "}]"#;
        let records = parse_records(input).unwrap();
        assert_eq!(records[0].description, "текст");
    }

    #[test]
    fn json_lines_are_supported() {
        let input = "{\"title\": \"A\", \"descr\": \"мозг как компьютер\"}\n\n{\"descr\": \"пейзаж\"}\n";
        let records = parse_records(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title, "Item_1");
    }

    #[test]
    fn single_object_is_one_record() {
        let input = "{\n  \"title\": \"Solo\",\n  \"descr\": \"тело как медиум\"\n}";
        let records = parse_records(input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Solo");
        assert_eq!(records[0].description, "тело как медиум");
    }

    #[test]
    fn plain_text_is_one_description() {
        let records = parse_records("  Нейросеть обретает сознание.\n").unwrap();
        assert_eq!(records[0].title, "Item_0");
        assert_eq!(records[0].description, "Нейросеть обретает сознание.");
    }

    #[test]
    fn rows_without_text_columns_are_rejected() {
        let err = parse_records(r#"[{"title": "x", "body": "y"}]"#).unwrap_err();
        assert!(matches!(err, IngestError::NoTextColumns));
    }

    #[test]
    fn non_string_cells_are_invalid() {
        let err = parse_records(r#"[{"descr": "ok"}, {"descr": 42}]"#).unwrap_err();
        assert!(matches!(err, IngestError::InvalidInput { index: 1, .. }));
    }

    #[test]
    fn malformed_json_lines_report_line() {
        let err = parse_as("{\"descr\": \"a\"}\n{broken\n", InputFormat::Json).unwrap_err();
        assert!(matches!(err, IngestError::Json { line: 2, .. }));
    }

    #[test]
    fn bracketed_plain_text_is_one_description() {
        let text = "[Инсталляция] Нейросеть обретает сознание.";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, text);

        let records = parse_records("{draft} тело как медиум\n").unwrap();
        assert_eq!(records[0].description, "{draft} тело как медиум");
    }

    #[test]
    fn text_extension_never_parses_json() {
        let records = parse_as(r#"[{"descr": "x"}]"#, InputFormat::Text).unwrap();
        assert_eq!(records[0].description, r#"[{"descr": "x"}]"#);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.JSONL")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("works.csv")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("note.txt")), InputFormat::Text);
        assert_eq!(InputFormat::from_path(Path::new("stdin")), InputFormat::Auto);
    }

    #[test]
    fn csv_rows_keep_their_columns() {
        let input = "id,title,descr,descr_en\n\
                     1,Рой,\"роевой разум, синергия\",swarm\n\
                     2,,пейзаж,\n";
        let records = parse_as(input, InputFormat::Csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Рой");
        assert_eq!(records[0].description, "роевой разум, синергия swarm");
        assert_eq!(records[1].title, "Item_1");
        assert_eq!(records[1].description, "пейзаж");
        assert_eq!(
            records[0].columns.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            vec!["id", "title", "descr", "descr_en"]
        );
        assert_eq!(records[0].columns[0], ("id".to_string(), "1".to_string()));
    }

    #[test]
    fn csv_without_text_columns_is_rejected() {
        let err = parse_as("title,body\nx,y\n", InputFormat::Csv).unwrap_err();
        assert!(matches!(err, IngestError::NoTextColumns));
    }

    #[test]
    fn ragged_csv_is_an_error() {
        let err = parse_as("title,descr\nx,y,z\n", InputFormat::Csv).unwrap_err();
        assert!(matches!(err, IngestError::Csv(_)));
    }

    #[test]
    fn empty_array_is_empty() {
        assert!(parse_records("[]").unwrap().is_empty());
    }
}
