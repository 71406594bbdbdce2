//! End-to-end pipeline tests: URL list in, CSV rows out

use crate::{create_requester, create_test_config};
use site_url_checker::output::CsvSink;
use site_url_checker::pipeline::{Pipeline, RunSummary};
use site_url_checker::robots::RobotsPolicy;
use site_url_checker::url::IgnoreRules;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runs a pipeline over `input` and returns the summary plus the parsed rows
async fn run_pipeline(
    pipeline: &Pipeline,
    input: impl AsRef<[u8]>,
) -> (RunSummary, Vec<Vec<String>>) {
    let sink = CsvSink::new(Vec::new()).expect("Failed to create sink");
    let outcome = pipeline
        .run(input.as_ref(), sink, CancellationToken::new())
        .await
        .expect("Pipeline run failed");

    let bytes = outcome.sink.into_inner().expect("Failed to flush sink");
    (outcome.summary, parse_rows(&bytes))
}

/// Parses CSV output, checking the header and returning the data rows
fn parse_rows(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader.headers().expect("Missing header").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "url",
            "status",
            "redirects number",
            "final URL",
            "allowed by robots.txt",
            "error"
        ]
    );

    reader
        .records()
        .map(|record| {
            record
                .expect("Invalid CSV row")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// Mounts `/ok/*` (200), `/gone/*` (404) and `/moved/*` (301 to `/ok/landing`)
async fn mount_site(mock_server: &MockServer) {
    Mock::given(method("HEAD"))
        .and(path_regex(r"^/ok/.*$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path_regex(r"^/gone/.*$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path_regex(r"^/moved/.*$"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/ok/landing", mock_server.uri()).as_str()),
        )
        .mount(mock_server)
        .await;
}

fn site_urls(base_url: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 3 {
            0 => format!("{}/ok/{}", base_url, i),
            1 => format!("{}/gone/{}", base_url, i),
            _ => format!("{}/moved/{}", base_url, i),
        })
        .collect()
}

#[tokio::test]
async fn test_every_url_gets_one_row() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let urls = site_urls(&base_url, 30);
    let input = urls.join("\n");

    let config = create_test_config(4);
    let pipeline = Pipeline::new(create_requester(&config, None), config.checker.workers);
    let (summary, rows) = run_pipeline(&pipeline, &input).await;

    assert_eq!(summary.read, 30);
    assert_eq!(summary.dispatched, 30);
    assert_eq!(summary.ignored, 0);
    assert_eq!(summary.written, 30);
    assert_eq!(summary.write_failures, 0);
    assert!(!summary.interrupted);
    assert_eq!(rows.len(), 30);

    for row in &rows {
        let url = &row[0];
        if url.contains("/ok/") {
            assert_eq!(row[1..], ["200", "0", "", "", ""]);
        } else if url.contains("/gone/") {
            assert_eq!(row[1..], ["404", "0", "", "", ""]);
        } else {
            let landing = format!("{}/ok/landing", base_url);
            assert_eq!(row[1], "200");
            assert_eq!(row[2], "1");
            assert_eq!(row[3], landing);
        }
    }

    let mut written_urls: Vec<_> = rows.iter().map(|row| row[0].clone()).collect();
    let mut expected_urls = urls.clone();
    written_urls.sort();
    expected_urls.sort();
    assert_eq!(written_urls, expected_urls);
}

#[tokio::test]
async fn test_worker_count_does_not_change_results() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let input = site_urls(&mock_server.uri(), 24).join("\n");

    let mut results = Vec::new();
    for workers in [1, 4, 16] {
        let config = create_test_config(workers);
        let pipeline = Pipeline::new(create_requester(&config, None), workers);
        assert_eq!(pipeline.workers(), workers);

        let (summary, mut rows) = run_pipeline(&pipeline, &input).await;
        assert_eq!(summary.written, 24, "workers = {}", workers);
        rows.sort();
        results.push(rows);
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}

#[tokio::test]
async fn test_ignored_urls_produce_no_rows() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path_regex(r"^/page/.*$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path_regex(r"^/static/.*$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let input = format!(
        "{0}/page/a\n{0}/static/logo.png\n{0}/page/b\n{0}/static/app.js\n",
        base_url
    );

    let rules = IgnoreRules::from_lines("# skip assets\n/static/\n").unwrap();
    let config = create_test_config(2);
    let pipeline = Pipeline::new(create_requester(&config, None), 2).with_ignore_rules(rules);
    let (summary, rows) = run_pipeline(&pipeline, &input).await;

    assert_eq!(summary.read, 4);
    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.ignored, 2);
    assert_eq!(summary.written, 2);
    assert!(rows.iter().all(|row| row[0].contains("/page/")));
}

#[tokio::test]
async fn test_robots_column_follows_policy() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let input = format!("{0}/private/x\n{0}/public/y\n", base_url);

    let policy = RobotsPolicy::new("User-agent: *\nDisallow: /private/\n", "Googlebot");
    let config = create_test_config(2);
    let pipeline = Pipeline::new(create_requester(&config, Some(policy)), 2);
    let (_, rows) = run_pipeline(&pipeline, &input).await;

    let verdict = |suffix: &str| {
        rows.iter()
            .find(|row| row[0].ends_with(suffix))
            .map(|row| row[4].clone())
            .expect("row missing")
    };
    assert_eq!(verdict("/private/x"), "disallowed");
    assert_eq!(verdict("/public/y"), "allowed");

    // Without a policy the column stays empty
    let pipeline = Pipeline::new(create_requester(&config, None), 2);
    let (_, rows) = run_pipeline(&pipeline, &input).await;
    assert!(rows.iter().all(|row| row[4].is_empty()));
}

#[tokio::test]
async fn test_failed_urls_still_get_rows() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/fine"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let input = format!(
        "http://127.0.0.1:{}/down\n{}/fine\n",
        port,
        mock_server.uri()
    );

    let config = create_test_config(2);
    let pipeline = Pipeline::new(create_requester(&config, None), 2);
    let (summary, rows) = run_pipeline(&pipeline, &input).await;

    assert_eq!(summary.written, 2);
    let down = rows
        .iter()
        .find(|row| row[0].ends_with("/down"))
        .expect("row missing");
    assert_eq!(down[1], "err");
    assert_eq!(down[2], "0");
    assert!(!down[5].is_empty());
}

#[tokio::test]
async fn test_empty_input_writes_only_header() {
    let config = create_test_config(3);
    let pipeline = Pipeline::new(create_requester(&config, None), 3);
    let (summary, rows) = run_pipeline(&pipeline, "").await;

    assert_eq!(summary.read, 0);
    assert_eq!(summary.dispatched, 0);
    assert_eq!(summary.written, 0);
    assert!(!summary.interrupted);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_blank_lines_are_skipped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let input = format!("{0}/a\n\n   \n{0}/b\n", mock_server.uri());
    let config = create_test_config(1);
    let pipeline = Pipeline::new(create_requester(&config, None), 1);
    let (summary, rows) = run_pipeline(&pipeline, &input).await;

    assert_eq!(summary.dispatched, 2);
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_invalid_utf8_line_does_not_abort_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let mut input = Vec::new();
    input.extend_from_slice(format!("{}/a\n", base_url).as_bytes());
    input.extend_from_slice(format!("{}/caf", base_url).as_bytes());
    input.extend_from_slice(b"\xe9\n");
    input.extend_from_slice(format!("{0}/b\n{0}/c\n", base_url).as_bytes());

    let config = create_test_config(1);
    let pipeline = Pipeline::new(create_requester(&config, None), 1);
    let (summary, rows) = run_pipeline(&pipeline, &input).await;

    assert_eq!(summary.read, 4);
    assert_eq!(summary.dispatched, 4);
    assert_eq!(summary.written, 4);
    assert!(!summary.interrupted);

    for suffix in ["/a", "/caf\u{FFFD}", "/b", "/c"] {
        let row = rows
            .iter()
            .find(|row| row[0].ends_with(suffix))
            .unwrap_or_else(|| panic!("no row for {}", suffix));
        assert_eq!(row[1], "200");
    }
}

#[tokio::test]
async fn test_interrupt_stops_run_promptly() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let input = (0..20)
        .map(|i| format!("{}/slow/{}", mock_server.uri(), i))
        .collect::<Vec<_>>()
        .join("\n");

    let config = create_test_config(2);
    let pipeline = Pipeline::new(create_requester(&config, None), 2);

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let sink = CsvSink::new(Vec::new()).unwrap();
    let outcome = pipeline
        .run(input.as_bytes(), sink, shutdown)
        .await
        .expect("Interrupted run should still succeed");

    assert!(outcome.summary.interrupted);
    assert_eq!(outcome.summary.written, 0);
    assert!(outcome.summary.dispatched < 20);
    assert!(started.elapsed() < Duration::from_secs(2));

    // The header survives the interrupt
    let bytes = outcome.sink.into_inner().unwrap();
    assert!(parse_rows(&bytes).is_empty());
}
