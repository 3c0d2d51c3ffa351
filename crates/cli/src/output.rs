//! Output writers: CSV/JSON record dumps and the text card/detail views.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use aidir_engine::{Card, CompanyRecord, DetailView, Field};

use crate::CliError;

/// Open `--out` or stdout.
fn open_output(out: &Option<PathBuf>) -> Result<Box<dyn Write>, CliError> {
    Ok(match out {
        Some(path) => {
            let f = std::fs::File::create(path).map_err(|e| {
                CliError::io(format!("cannot create {}: {}", path.display(), e))
            })?;
            Box::new(std::io::BufWriter::new(f))
        }
        None => Box::new(std::io::BufWriter::new(std::io::stdout().lock())),
    })
}

/// Write records as CSV with one column per field, keys as the header.
pub fn write_records_csv<W: Write>(records: &[CompanyRecord], writer: W) -> Result<(), CliError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    // Always write header, even with zero rows
    if records.is_empty() {
        csv_writer
            .write_record(Field::ALL.iter().map(|f| f.key()))
            .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
    }

    for record in records {
        csv_writer
            .serialize(record)
            .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CliError::io(format!("CSV flush error: {}", e)))
}

pub fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, mut writer: W) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| CliError::io(format!("JSON write error: {}", e)))?;
    writeln!(writer).map_err(|e| CliError::io(e.to_string()))?;
    writer.flush().map_err(|e| CliError::io(e.to_string()))
}

/// `fetch` output: every record, CSV or JSON, to `--out` or stdout.
/// Returns a label for the destination.
pub fn dump_records(records: &[CompanyRecord], out: &Option<PathBuf>, json: bool) -> Result<String, CliError> {
    let label = out
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());

    let writer = open_output(out)?;
    if json {
        write_json(records, writer)?;
    } else {
        write_records_csv(records, writer)?;
    }
    Ok(label)
}

const CARD_LABEL_WIDTH: usize = 14;

pub fn render_card(card: &Card<'_>) -> String {
    let mut s = String::new();
    s.push_str(card.name);
    s.push('\n');
    for (label, value) in [
        ("Industry", card.industry),
        ("Headquarters", card.headquarters),
        ("Valuation", card.valuation),
        ("Website", card.website_display),
    ] {
        s.push_str(&format!("  {:<width$}{}\n", format!("{}:", label), value, width = CARD_LABEL_WIDTH));
    }
    s
}

pub fn render_detail(view: &DetailView<'_>) -> String {
    let mut s = String::new();
    s.push_str(view.name);
    s.push('\n');
    s.push_str(&"=".repeat(view.name.chars().count().max(1)));
    s.push_str("\n\n");
    s.push_str(view.description);
    s.push('\n');

    for section in &view.sections {
        s.push('\n');
        s.push_str(section.title);
        s.push('\n');
        let width = section
            .items
            .iter()
            .map(|i| i.label.len() + 1)
            .max()
            .unwrap_or(0)
            + 2;
        for item in &section.items {
            s.push_str(&format!("  {:<width$}{}\n", format!("{}:", item.label), item.value, width = width));
        }
    }
    s
}

pub fn results_line(n: usize) -> String {
    if n == 1 {
        "1 result".to_string()
    } else {
        format!("{} results", n)
    }
}
