use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use laptop_scraper::config::Settings;
use laptop_scraper::export;
use laptop_scraper::session::{RefreshSource, Session, View};
use laptop_scraper::Extractor;

type Heads = Arc<Mutex<Vec<String>>>;

/// Serve `body` with `status` to every connection. Returns the base url and a hit counter.
async fn serve(status: &'static str, body: String) -> (String, Arc<AtomicUsize>) {
    let (url, hits, _) = serve_recording(status, body).await;
    (url, hits)
}

/// Like `serve`, also keeping the raw head of every request received.
async fn serve_recording(status: &'static str, body: String) -> (String, Arc<AtomicUsize>, Heads) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let heads: Heads = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&heads);

    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let body = body.clone();
            let recorded = Arc::clone(&recorded);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let mut seen = Vec::new();
                while let Ok(n) = sock.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                    seen.extend_from_slice(&buf[..n]);
                    if seen.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                recorded
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&seen).into_owned());
                let resp = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    let url = format!("http://{}/test-sites/e-commerce/static/computers/laptops", addr);
    (url, hits, heads)
}

/// Accepts connections and never answers.
async fn silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });
    format!("http://{}/", addr)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
}

fn extractor(timeout_secs: u64) -> Extractor {
    let settings = Settings {
        timeout_secs,
        ..Settings::default()
    };
    Extractor::new(&settings).unwrap()
}

#[tokio::test]
async fn fetch_and_extract_three_cards() {
    let (url, _) = serve("200 OK", fixture("three_cards")).await;
    let mut reported = None;
    let records = extractor(10)
        .fetch_and_extract(&url, |e| reported = Some(e.to_string()))
        .await;

    assert!(reported.is_none());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].price, 199.99);
    assert_eq!(records[1].description, "N/A");
}

#[tokio::test]
async fn request_carries_browser_user_agent() {
    let (url, _, heads) = serve_recording("200 OK", fixture("three_cards")).await;
    let records = extractor(10).fetch_and_extract(&url, |_| {}).await;
    assert_eq!(records.len(), 2);

    let heads = heads.lock().unwrap();
    assert_eq!(heads.len(), 1);
    let head = heads[0].to_ascii_lowercase();
    assert!(
        head.contains("user-agent: mozilla/5.0 (windows nt 10.0; win64; x64) applewebkit/537.36\r\n"),
        "request head was: {}",
        heads[0]
    );
}

#[test]
fn invalid_user_agent_fails_setup() {
    let settings = Settings {
        user_agent: "Mozilla/5.0\n(Windows)".into(),
        ..Settings::default()
    };
    assert!(Extractor::new(&settings).is_err());
}

#[tokio::test]
async fn non_2xx_yields_empty_and_reports() {
    let (url, _) = serve("503 Service Unavailable", fixture("laptops")).await;
    let mut reported = None;
    let records = extractor(10)
        .fetch_and_extract(&url, |e| reported = Some(e.to_string()))
        .await;

    assert!(records.is_empty());
    assert!(reported.unwrap().contains("503"));
}

#[tokio::test]
async fn connection_refused_yields_empty() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let mut called = false;
    let records = extractor(10).fetch_and_extract(&url, |_| called = true).await;
    assert!(records.is_empty());
    assert!(called);
}

#[tokio::test]
async fn timeout_yields_empty() {
    let url = silent().await;
    let started = std::time::Instant::now();
    let mut called = false;
    let records = extractor(1).fetch_and_extract(&url, |_| called = true).await;
    assert!(records.is_empty());
    assert!(called);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn session_refresh_memoizes_within_ttl() {
    let (url, hits) = serve("200 OK", fixture("laptops")).await;
    let ex = extractor(10);
    let mut session = Session::new(Duration::from_secs(3600));

    assert_eq!(session.refresh(&ex, &url).await, RefreshSource::Network);
    assert_eq!(session.refresh(&ex, &url).await, RefreshSource::Cache);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    match session.view() {
        View::Ready(snap) => {
            assert_eq!(snap.records.len(), 6);
            assert_eq!(snap.skipped, 0);
            assert_eq!(snap.url, url);
        }
        other => panic!("expected data, got {:?}", other),
    }

    session.clear_cache();
    assert_eq!(session.refresh(&ex, &url).await, RefreshSource::Network);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn session_zero_ttl_always_fetches() {
    let (url, hits) = serve("200 OK", fixture("three_cards")).await;
    let ex = extractor(10);
    let mut session = Session::new(Duration::ZERO);

    session.refresh(&ex, &url).await;
    session.refresh(&ex, &url).await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(session.snapshot().unwrap().skipped, 1);
}

#[tokio::test]
async fn expired_entries_are_evicted() {
    let (first, _) = serve("200 OK", fixture("three_cards")).await;
    let (second, _) = serve("200 OK", fixture("laptops")).await;
    let ex = extractor(10);
    let mut session = Session::new(Duration::from_millis(50));

    session.refresh(&ex, &first).await;
    assert_eq!(session.cached_urls(), 1);
    tokio::time::sleep(Duration::from_millis(120)).await;

    session.refresh(&ex, &second).await;
    assert_eq!(session.cached_urls(), 1);
    assert_eq!(session.snapshot().unwrap().url, second);
}

#[tokio::test]
async fn failed_refresh_replaces_snapshot_with_no_data() {
    let (good, _) = serve("200 OK", fixture("laptops")).await;
    let (bad, _) = serve("404 Not Found", String::new()).await;
    let ex = extractor(10);
    let mut session = Session::new(Duration::from_secs(3600));

    session.refresh(&ex, &good).await;
    assert!(matches!(session.view(), View::Ready(_)));

    assert_eq!(session.refresh(&ex, &bad).await, RefreshSource::Failed);
    match session.view() {
        View::NoData { error } => assert!(error.unwrap().contains("404")),
        other => panic!("expected no data, got {:?}", other),
    }

    // failures are not memoized, the good url still is
    assert_eq!(session.refresh(&ex, &good).await, RefreshSource::Cache);
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn page_without_cards_is_no_data_not_error() {
    let (url, _) = serve("200 OK", "<html><body><p>Nothing</p></body></html>".into()).await;
    let mut session = Session::default();
    assert_eq!(session.refresh(&extractor(10), &url).await, RefreshSource::Network);
    assert_eq!(session.view(), View::NoData { error: None });
    assert!(session.last_refreshed().is_some());
}

#[tokio::test]
async fn scraped_records_survive_export_round_trip() {
    let (url, _) = serve("200 OK", fixture("laptops")).await;
    let records = extractor(10).fetch_and_extract(&url, |_| {}).await;

    let csv = export::to_csv(&records).unwrap();
    assert_eq!(export::from_csv(&csv).unwrap(), records);
    let json = export::to_json(&records).unwrap();
    assert_eq!(export::from_json(&json).unwrap(), records);
}
