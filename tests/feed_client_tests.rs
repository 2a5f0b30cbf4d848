use job_dashboard::feed::{FeedClient, FeedError, FeedSource, JobFeed};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const JOBS_JSON: &str = r#"[
    {"company": "Acme", "title": "SWE Intern", "location": "Remote, US",
     "url": "https://acme.dev/1", "posted_date": "2024-05-01T12:00:00Z",
     "provider": "greenhouse", "description": "", "role_category": "SWE", "level": "Junior"},
    {"company": "Globex", "title": "Data Analyst", "location": "New York, NY",
     "url": "https://globex.dev/2", "posted_date": "garbage", "provider": "lever", "description": ""}
]"#;

/// Serve one canned HTTP response and report the request line
async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_string();
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(request_line);
    });

    (format!("http://{}/data/jobs.json", addr), rx)
}

#[tokio::test]
async fn test_fetch_jobs_over_http() {
    let (url, request) = serve_once("HTTP/1.1 200 OK", JOBS_JSON).await;
    let client = FeedClient::new(&url).unwrap();
    assert!(matches!(client.source(), FeedSource::Http(_)));

    let jobs = client.fetch_jobs().await;
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].company, "Acme");
    assert_eq!(jobs[0].level.as_deref(), Some("Junior"));
    assert_eq!(jobs[1].posted_date, "garbage");
    assert!(jobs[1].role_category.is_none());

    let request_line = request.await.unwrap();
    assert!(request_line.starts_with("GET /data/jobs.json?t="), "{}", request_line);
    let stamp: i64 = request_line
        .split("t=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
        .unwrap();
    assert!(stamp > 0);
}

#[tokio::test]
async fn test_http_500_yields_empty_list() {
    let (url, _request) = serve_once("HTTP/1.1 500 Internal Server Error", "").await;
    let client = FeedClient::new(&url).unwrap();

    let jobs = client.fetch_jobs().await;
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn test_http_500_reports_status() {
    let (url, _request) = serve_once("HTTP/1.1 500 Internal Server Error", "").await;
    let client = FeedClient::new(&url).unwrap();

    match client.try_fetch_jobs().await {
        Err(FeedError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_yields_empty_list() {
    let (url, _request) = serve_once("HTTP/1.1 200 OK", "{\"not\": \"a list\"}").await;
    let client = FeedClient::new(&url).unwrap();

    assert!(client.fetch_jobs().await.is_empty());
}

#[tokio::test]
async fn test_connection_refused_yields_empty_list() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = FeedClient::new(&format!("http://{}/jobs.json", addr)).unwrap();
    assert!(matches!(
        client.try_fetch_jobs().await,
        Err(FeedError::Transport { .. })
    ));
    assert!(client.fetch_jobs().await.is_empty());
}

#[tokio::test]
async fn test_fetch_jobs_from_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.json");
    std::fs::write(&path, JOBS_JSON).unwrap();

    let client = FeedClient::new(path.to_str().unwrap()).unwrap();
    let jobs = client.fetch_jobs().await;
    assert_eq!(jobs.len(), 2);

    let via_scheme = FeedClient::new(&format!("file://{}", path.display())).unwrap();
    assert_eq!(via_scheme.fetch_jobs().await, jobs);
}

#[tokio::test]
async fn test_missing_file_yields_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let client = FeedClient::new(dir.path().join("absent.json").to_str().unwrap()).unwrap();

    assert!(matches!(client.try_fetch_jobs().await, Err(FeedError::Io { .. })));
    assert!(client.fetch_jobs().await.is_empty());
}

const MIXED_JSON: &str = r#"[
    {"company": "Acme", "title": "SWE Intern", "location": "Remote, US",
     "url": "https://acme.dev/1", "posted_date": "2024-05-01T12:00:00Z",
     "provider": "greenhouse", "description": "Build things"},
    {"company": "Leverage", "title": "New Grad Engineer", "location": "Austin, TX",
     "url": "https://jobs.lever.co/leverage/2", "posted_date": 1714564800000,
     "provider": "lever", "description": null, "level": null}
]"#;

#[tokio::test]
async fn test_mixed_feed_keeps_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.json");
    std::fs::write(&path, MIXED_JSON).unwrap();

    let client = FeedClient::new(path.to_str().unwrap()).unwrap();
    let jobs = client.try_fetch_jobs().await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[1].posted_date, "1714564800000");
    assert_eq!(jobs[1].description, "");
    assert!(jobs[1].level.is_none());
    assert_eq!(
        job_dashboard::time_utils::parse_instant(&jobs[1].posted_date),
        job_dashboard::time_utils::parse_instant(&jobs[0].posted_date)
    );
}

#[tokio::test]
async fn test_mixed_feed_over_http() {
    let (url, _request) = serve_once("HTTP/1.1 200 OK", MIXED_JSON).await;
    let client = FeedClient::new(&url).unwrap();

    let jobs = client.fetch_jobs().await;
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[1].provider, "lever");
}

#[tokio::test]
async fn test_convenience_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.json");
    std::fs::write(&path, "[]").unwrap();

    let jobs = job_dashboard::fetch_jobs(path.to_str().unwrap()).await.unwrap();
    assert!(jobs.is_empty());
}
