//! End-to-end ingestion: mock sheet endpoint → source adapter → Directory.

use std::thread;
use std::time::Duration;

use httpmock::prelude::*;

use aidir_engine::{Lookup, SearchFields};
use aidir_io::PayloadFormat;
use aidir_sheet_client::{
    source_for, Directory, FetchError, IngestError, SheetLocation, SourceOptions,
};

const CSV_HEADER: &str = "Company Name,Website URL,Industry,Headquarters,Founding Year,Employee Count,Funding Raised,Revenue,Valuation,Description,Founders & LinkedIn,Key Contacts,Social Media Links,AI Models Used,Primary AI Use Case,AI Frameworks Used,AI Products/Services,Patent Details,AI Research Papers,Partnerships";

fn sheet_csv() -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        CSV_HEADER,
        "Acme AI,https://www.acme.ai,Robotics,Austin,2015,120,$40M,$10M,$400M,Warehouse robots",
        "Zenith,https://zenith.ai,NLP,Berlin,2019",
        "Orbit Labs,https://orbit.dev,Computer Vision,Paris",
    )
}

fn options_for(server: &MockServer) -> SourceOptions {
    SourceOptions {
        base_url: Some(server.base_url()),
        ..Default::default()
    }
}

#[test]
fn test_csv_ingest_then_search_and_lookup() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/sheet1/export").query_param("gid", "0");
        then.status(200).body(sheet_csv());
    });

    let source = source_for(
        PayloadFormat::Csv,
        &SheetLocation::new("sheet1", "0"),
        &options_for(&server),
    )
    .unwrap();

    let mut dir = Directory::new();
    assert_eq!(dir.ingest(source.as_ref()), Ok(3));
    mock.assert_hits(1);

    // Search "ai" over the list-page fields: name, industry, headquarters.
    dir.set_search_fields(SearchFields::list_page());
    let hits: Vec<&str> = dir.search("AI").iter().map(|r| r.name.as_str()).collect();
    assert_eq!(hits, vec!["Acme AI"]);

    // Exact, case-sensitive lookup.
    let acme = dir.find_by_name("Acme AI").found().unwrap();
    assert_eq!(acme.valuation, "$400M");
    assert_eq!(dir.find_by_name("acme ai"), Lookup::NotFound);

    // Short rows pad with empty fields.
    let zenith = dir.find_by_name("Zenith").found().unwrap();
    assert_eq!(zenith.founding_year, "2019");
    assert_eq!(zenith.employee_count, "");
    assert_eq!(zenith.partnerships, "");
}

#[test]
fn test_refresh_failure_keeps_last_good_records() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/sheet1/export");
        then.status(200).body(sheet_csv());
    });

    let source = source_for(
        PayloadFormat::Csv,
        &SheetLocation::new("sheet1", "0"),
        &options_for(&server),
    )
    .unwrap();

    let mut dir = Directory::new();
    dir.ingest(source.as_ref()).unwrap();
    ok.delete();

    server.mock(|when, then| {
        when.method(GET).path("/sheet1/export");
        then.status(500).body("backend error");
    });

    let err = dir.ingest(source.as_ref()).unwrap_err();
    assert!(matches!(err, IngestError::Fetch(FetchError::Status { status: 500, .. })));
    assert_eq!(dir.records().len(), 3);
    assert_eq!(dir.error(), Some(&err));
    assert!(!dir.is_loading());
}

#[test]
fn test_unreachable_host_sets_fetch_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let options = SourceOptions {
        base_url: Some(format!("http://127.0.0.1:{}", port)),
        ..Default::default()
    };
    let source = source_for(PayloadFormat::Gviz, &SheetLocation::new("s", "0"), &options).unwrap();

    let mut dir = Directory::new();
    let err = dir.ingest(source.as_ref()).unwrap_err();
    assert!(matches!(err, IngestError::Fetch(FetchError::Network(_))), "{:?}", err);
    assert!(dir.records().is_empty());
    assert!(!dir.is_loading());
    assert_eq!(dir.find_by_name("Acme AI"), Lookup::NotFound);
}

#[test]
fn test_gviz_ingest_maps_by_label() {
    let server = MockServer::start();
    let body = concat!(
        "/*O_o*/\ngoogle.visualization.Query.setResponse(",
        r#"{"version":"0.6","status":"ok","table":{"cols":["#,
        r#"{"id":"A","label":"Website","type":"string"},"#,
        r#"{"id":"B","label":"Company Name","type":"string"},"#,
        r#"{"id":"C","label":"Valuation","type":"string"}],"rows":["#,
        r#"{"c":[{"v":"https://acme.ai"},{"v":"Acme AI"},{"v":"$400M"}]}]}});"#
    );
    server.mock(|when, then| {
        when.method(GET).path("/sheet1/gviz/tq").query_param("tqx", "out:json");
        then.status(200).body(body);
    });

    let source = source_for(
        PayloadFormat::Gviz,
        &SheetLocation::new("sheet1", "0"),
        &options_for(&server),
    )
    .unwrap();

    let mut dir = Directory::new();
    dir.ingest(source.as_ref()).unwrap();
    let acme = &dir.records()[0];
    assert_eq!(acme.name, "Acme AI");
    assert_eq!(acme.website_url, "https://acme.ai");
    assert_eq!(acme.valuation, "$400M");
    assert_eq!(acme.industry, "");
}

#[test]
fn test_cancel_while_response_in_flight_drops_result() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sheet1/export").query_param("gid", "0");
        then.status(200).body(sheet_csv());
    });
    let slow = server.mock(|when, then| {
        when.method(GET).path("/sheet1/export").query_param("gid", "1");
        then.status(200)
            .delay(Duration::from_millis(800))
            .body(format!("{}\nReplacement Co,https://replacement.ai\n", CSV_HEADER));
    });

    let mut dir = Directory::new();
    let first = source_for(
        PayloadFormat::Csv,
        &SheetLocation::new("sheet1", "0"),
        &options_for(&server),
    )
    .unwrap();
    assert_eq!(dir.ingest(first.as_ref()), Ok(3));

    let second = source_for(
        PayloadFormat::Csv,
        &SheetLocation::new("sheet1", "1"),
        &options_for(&server),
    )
    .unwrap();
    let ticket = dir.begin_ingest();
    let token = ticket.cancel_token().clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        token.cancel();
    });

    // The request goes out; the token flips before the body is parsed.
    let result = second.fetch_records(ticket.cancel_token());
    canceller.join().unwrap();
    slow.assert_hits(1);
    assert_eq!(result, Err(IngestError::Cancelled));

    assert!(!dir.complete(ticket, result));
    assert!(!dir.is_loading());
    assert_eq!(dir.records().len(), 3);
    assert_eq!(dir.error(), None);
    assert_eq!(dir.find_by_name("Replacement Co"), Lookup::NotFound);
    assert!(dir.find_by_name("Acme AI").found().is_some());
}
