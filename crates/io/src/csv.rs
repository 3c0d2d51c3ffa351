// CSV export parsing
//
// The sheet's CSV export is split naively: one row per line, cells on every
// comma, no quote handling. A cell containing a literal comma shifts every
// later cell of that row one column to the right. That is a known limitation
// of this format; use the gviz format for sheets with commas in values.

use aidir_engine::{CompanyRecord, Field};

use crate::{precheck, ParseError, PayloadFormat};

/// Split one line into cells.
pub fn split_row(line: &str) -> impl Iterator<Item = &str> {
    line.split(',')
}

/// Name the format of a first line that cannot be a CSV header.
fn foreign_header(header: &str) -> Option<&'static str> {
    let head = header.trim_start();
    if head.starts_with("/*O_o*/") || head.contains("setResponse(") {
        Some("a gviz response")
    } else if head.starts_with('{') || head.starts_with('[') {
        Some("JSON")
    } else {
        None
    }
}

/// Parse a CSV export into records. The first line is the header and is
/// discarded; every following line becomes one record, positionally mapped.
pub fn parse_records(text: &str) -> Result<Vec<CompanyRecord>, ParseError> {
    let text = precheck(text, PayloadFormat::Csv)?;

    // `lines` also drops the `\r` of CRLF exports and the final terminator.
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();
    if let Some(found) = foreign_header(header) {
        return Err(ParseError::WrongFormat {
            expected: PayloadFormat::Csv,
            found: found.to_string(),
        });
    }
    let header_width = split_row(header).count();

    let mut records = Vec::new();
    let mut short_rows = 0usize;

    for (idx, line) in lines.enumerate() {
        let cells: Vec<&str> = split_row(line).collect();
        if cells.len() < Field::COUNT {
            short_rows += 1;
        }
        if cells.len() > header_width {
            log::warn!(
                "CSV row {} has {} cells but the header has {}; a value probably contains a comma",
                idx + 2,
                cells.len(),
                header_width,
            );
        }
        records.push(CompanyRecord::from_cells(cells));
    }

    if short_rows > 0 {
        log::debug!(
            "{} of {} CSV rows had fewer than {} cells; missing fields left empty",
            short_rows,
            records.len(),
            Field::COUNT,
        );
    }
    log::debug!("parsed {} records from CSV export", records.len());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_header() -> String {
        Field::ALL.iter().map(|f| f.label()).collect::<Vec<_>>().join(",")
    }

    #[test]
    fn test_rows_after_header_become_records_in_order() {
        let text = format!(
            "{}\nAcme,https://acme.ai,Robotics,Austin\nZenith,https://zenith.ai,NLP,Berlin\nOrbit,,Vision,Paris\n",
            full_header()
        );
        let records = parse_records(&text).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Zenith", "Orbit"]);
        assert_eq!(records[1].industry, "NLP");
        assert_eq!(records[1].headquarters, "Berlin");
        assert_eq!(records[2].website_url, "");
    }

    #[test]
    fn test_full_width_row_maps_every_field() {
        let row: Vec<String> = Field::ALL.iter().map(|f| format!("v_{}", f.key())).collect();
        let text = format!("{}\n{}", full_header(), row.join(","));
        let records = parse_records(&text).unwrap();
        assert_eq!(records.len(), 1);
        for (field, value) in records[0].fields() {
            assert_eq!(value, format!("v_{}", field.key()));
        }
    }

    #[test]
    fn test_short_row_pads_trailing_fields() {
        let text = "Company Name,Website,Industry\nAcme,https://acme.ai\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.name, "Acme");
        assert_eq!(rec.website_url, "https://acme.ai");
        for field in &Field::ALL[2..] {
            assert_eq!(rec.get(*field), "", "{}", field);
        }
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let text = "Company Name,Industry\r\nAcme,https://acme.ai,Robotics\r\nZenith,https://zenith.ai,NLP";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].industry, "Robotics");
        assert_eq!(records[1].industry, "NLP");
    }

    #[test]
    fn test_header_only_yields_no_records() {
        assert!(parse_records("Company Name,Website\n").unwrap().is_empty());
    }

    #[test]
    fn test_interior_blank_line_is_an_empty_record() {
        let records = parse_records("h\nAcme\n\nZenith\n").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], CompanyRecord::default());
    }

    #[test]
    fn test_comma_in_value_shifts_columns() {
        // Documented limitation: no quote handling.
        let text = "Company Name,Website,Industry\n\"Acme, Inc\",https://acme.ai,Robotics\n";
        let rec = &parse_records(text).unwrap()[0];
        assert_eq!(rec.name, "\"Acme");
        assert_eq!(rec.website_url, " Inc\"");
        assert_eq!(rec.industry, "https://acme.ai");
    }

    #[test]
    fn test_rejects_empty_and_html() {
        assert_eq!(parse_records(""), Err(ParseError::Empty(PayloadFormat::Csv)));
        assert_eq!(
            parse_records("<html><body>Sign in</body></html>"),
            Err(ParseError::Html(PayloadFormat::Csv))
        );
    }

    #[test]
    fn test_rejects_gviz_body() {
        let gviz = "/*O_o*/\ngoogle.visualization.Query.setResponse({\"version\":\"0.6\",\"status\":\"ok\",\"table\":{\"cols\":[],\"rows\":[]}});";
        assert_eq!(
            parse_records(gviz),
            Err(ParseError::WrongFormat {
                expected: PayloadFormat::Csv,
                found: "a gviz response".into(),
            })
        );
        // Without the leading comment.
        let bare = "google.visualization.Query.setResponse({\"version\":\"0.6\"});";
        assert!(matches!(parse_records(bare), Err(ParseError::WrongFormat { .. })));
    }

    #[test]
    fn test_rejects_json_body() {
        assert!(matches!(
            parse_records("{\"error\":\"not found\"}\n"),
            Err(ParseError::WrongFormat { .. })
        ));
        assert_eq!(
            parse_records("[1,2]").unwrap_err().to_string(),
            "expected csv payload but got JSON"
        );
    }
}
