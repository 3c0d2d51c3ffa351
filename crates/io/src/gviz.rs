// Visualization API JSON parsing
//
// The `gviz/tq?tqx=out:json` endpoint answers with JavaScript, not JSON:
//
//   /*O_o*/
//   google.visualization.Query.setResponse({"version":"0.6",...,"table":{...}});
//
// The document inside `setResponse(...)` lists column labels in `table.cols`
// and typed cells in `table.rows[].c`. Cells map to fields by label.

use serde::Deserialize;
use serde_json::{Number, Value};

use aidir_engine::{CompanyRecord, Field};

use crate::{precheck, ColumnLabels, ParseError, PayloadFormat};

const ENVELOPE_OPEN: &str = "setResponse(";

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<Message>,
    #[serde(default)]
    table: Option<Table>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Message {
    reason: String,
    message: String,
    detailed_message: String,
}

impl Message {
    fn best_text(&self) -> &str {
        [&self.detailed_message, &self.message, &self.reason]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("unknown error")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Table {
    cols: Vec<Column>,
    rows: Vec<Row>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Column {
    label: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Row {
    c: Vec<Option<Cell>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Cell {
    v: Value,
}

/// Return the JSON document inside the `setResponse(...)` call.
pub fn strip_envelope(text: &str) -> Result<&str, ParseError> {
    let start = text
        .find(ENVELOPE_OPEN)
        .map(|i| i + ENVELOPE_OPEN.len())
        .ok_or_else(|| ParseError::Envelope("no setResponse( call found".into()))?;

    let end = text
        .rfind(')')
        .filter(|&end| end >= start)
        .ok_or_else(|| ParseError::Envelope("setResponse( call is not closed".into()))?;

    let trailing = text[end + 1..].trim();
    if !(trailing.is_empty() || trailing == ";") {
        let excerpt: String = trailing.chars().take(40).collect();
        return Err(ParseError::Envelope(format!(
            "unexpected text after setResponse(...): {:?}",
            excerpt
        )));
    }

    Ok(&text[start..end])
}

/// Render a cell value as display text. Integral numbers drop the fraction
/// (`2015`, never `2015.0`); `null` is empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Parse a gviz payload into records, mapping columns by exact label.
///
/// Columns without a label, or with a label no field claims, are skipped.
/// When two columns share a label, the later one wins. A row with fewer
/// cells than columns leaves the missing fields empty.
pub fn parse_records(text: &str, labels: &ColumnLabels) -> Result<Vec<CompanyRecord>, ParseError> {
    let text = precheck(text, PayloadFormat::Gviz)?;
    let json = strip_envelope(text)?;

    let response: Response =
        serde_json::from_str(json).map_err(|e| ParseError::Json(e.to_string()))?;

    if response.status.as_deref() == Some("error") {
        let msg = response
            .errors
            .first()
            .map(Message::best_text)
            .unwrap_or("unknown error");
        return Err(ParseError::Upstream(msg.to_string()));
    }

    let table = response
        .table
        .ok_or_else(|| ParseError::Json("response has no table".into()))?;

    let column_fields = map_columns(&table.cols, labels);

    let records: Vec<CompanyRecord> = table
        .rows
        .iter()
        .map(|row| {
            let mut record = CompanyRecord::default();
            for (cell, field) in row.c.iter().zip(&column_fields) {
                if let Some(field) = field {
                    let text = cell.as_ref().map(|c| cell_text(&c.v)).unwrap_or_default();
                    record.set(*field, text);
                }
            }
            record
        })
        .collect();

    log::debug!(
        "parsed {} records from gviz table ({} columns)",
        records.len(),
        table.cols.len()
    );

    Ok(records)
}

fn map_columns(cols: &[Column], labels: &ColumnLabels) -> Vec<Option<Field>> {
    let mapped: Vec<Option<Field>> = cols
        .iter()
        .map(|col| {
            if col.label.is_empty() {
                return None;
            }
            let field = labels.field_for(&col.label);
            if field.is_none() {
                log::debug!("ignoring unmapped gviz column {:?}", col.label);
            }
            field
        })
        .collect();

    for (i, field) in mapped.iter().enumerate() {
        if let Some(field) = field {
            if mapped[i + 1..].contains(&Some(*field)) {
                log::warn!(
                    "gviz column {:?} appears more than once; the last one wins",
                    labels.label(*field)
                );
            }
        }
    }

    mapped
}
