use album_uploader::app::UploadCore;
use album_uploader::config::ServiceConfig;
use album_uploader::domain::{Credentials, SignedRequest, UploadOutcome, UploadTarget};
use album_uploader::errors::UploadError;
use album_uploader::infra::GlobMatcher;
use album_uploader::ports::{
    MockCredentialStore, MockPatternMatcher, MockSigningClock, OutcomeReporter, UploadTransport,
};
use album_uploader::upload::RequestSigner;
use album_uploader::upload::hash::calculate_md5;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Transport that records requests and tracks how many sends overlap.
#[derive(Default)]
struct CountingTransport {
    active: AtomicUsize,
    max_active: AtomicUsize,
    calls: AtomicUsize,
    requests: Mutex<Vec<SignedRequest>>,
    fail_file: Option<String>,
}

#[async_trait]
impl UploadTransport for CountingTransport {
    async fn send(&self, request: SignedRequest) -> Result<UploadOutcome, UploadError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(20)).await;

        let name = request
            .body
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.requests.lock().expect("lock").push(request);
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail_file.as_deref() == Some(name.as_str()) {
            return Err(UploadError::Transport("connection reset by peer".to_string()));
        }
        Ok(UploadOutcome {
            status_line: "200 OK".to_string(),
            body: format!("{{\"Stat\":\"ok\",\"File\":\"{name}\"}}"),
        })
    }
}

#[derive(Default)]
struct CollectingReporter {
    reports: Mutex<Vec<(PathBuf, Result<String, String>)>>,
}

impl OutcomeReporter for CollectingReporter {
    fn report(&self, target: &UploadTarget, outcome: &Result<UploadOutcome, UploadError>) {
        let entry = match outcome {
            Ok(o) => Ok(o.status_line.clone()),
            Err(e) => Err(e.to_string()),
        };
        self.reports
            .lock()
            .expect("lock")
            .push((target.path.clone(), entry));
    }
}

fn fixed_signer() -> Arc<RequestSigner> {
    let mut clock = MockSigningClock::new();
    clock.expect_timestamp().return_const(1_700_000_000_i64);
    clock.expect_nonce().returning(|| "nonce".to_string());
    Arc::new(RequestSigner::new(
        ServiceConfig::new("ckey", "csecret"),
        Arc::new(clock),
    ))
}

fn good_credentials() -> Arc<MockCredentialStore> {
    let mut store = MockCredentialStore::new();
    store.expect_load().returning(|| {
        Ok(Credentials {
            token: "tok".to_string(),
            secret: "sec".to_string(),
        })
    });
    Arc::new(store)
}

fn photo_dir(count: usize) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for i in 0..count {
        let content: Vec<u8> = (0..(100 + i * 37)).map(|b| (b % 256) as u8).collect();
        fs::write(dir.path().join(format!("img{i:02}.jpg")), content).expect("write");
    }
    dir
}

fn glob_for(dir: &Path) -> String {
    format!("{}/*.jpg", dir.display())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn multi_upload_never_exceeds_parallel_limit() {
    let dir = photo_dir(9);
    let transport = Arc::new(CountingTransport::default());
    let reporter = Arc::new(CollectingReporter::default());
    let core = UploadCore::new(
        good_credentials(),
        Arc::new(GlobMatcher),
        fixed_signer(),
        transport.clone(),
        reporter.clone(),
    );

    let dispatched = core
        .multi_upload(3, "album1", &[glob_for(dir.path())])
        .await
        .expect("multi upload");

    assert_eq!(dispatched, 9);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 9);
    let max = transport.max_active.load(Ordering::SeqCst);
    assert!(max <= 3, "observed {max} concurrent uploads with a limit of 3");
    assert!(max >= 1);
    // Barrier: every unit has reported by the time the call returns.
    assert_eq!(transport.active.load(Ordering::SeqCst), 0);
    assert_eq!(reporter.reports.lock().expect("lock").len(), 9);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_of_one_serializes_uploads() {
    let dir = photo_dir(4);
    let transport = Arc::new(CountingTransport::default());
    let core = UploadCore::new(
        good_credentials(),
        Arc::new(GlobMatcher),
        fixed_signer(),
        transport.clone(),
        Arc::new(CollectingReporter::default()),
    );

    core.multi_upload(1, "album1", &[glob_for(dir.path())])
        .await
        .expect("multi upload");

    assert_eq!(transport.max_active.load(Ordering::SeqCst), 1);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn zero_parallel_is_rejected_without_side_effects() {
    let mut store = MockCredentialStore::new();
    store.expect_load().times(0);
    let mut matcher = MockPatternMatcher::new();
    matcher.expect_matches().times(0);
    let transport = Arc::new(CountingTransport::default());
    let reporter = Arc::new(CollectingReporter::default());

    let core = UploadCore::new(
        Arc::new(store),
        Arc::new(matcher),
        fixed_signer(),
        transport.clone(),
        reporter.clone(),
    );

    let result = core.multi_upload(0, "album1", &["*.jpg"]).await;

    assert!(matches!(result, Err(UploadError::InvalidConcurrency(0))));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    assert!(reporter.reports.lock().expect("lock").is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_failing_file_does_not_affect_the_others() {
    let dir = photo_dir(5);
    let transport = Arc::new(CountingTransport {
        fail_file: Some("img02.jpg".to_string()),
        ..CountingTransport::default()
    });
    let reporter = Arc::new(CollectingReporter::default());
    let core = UploadCore::new(
        good_credentials(),
        Arc::new(GlobMatcher),
        fixed_signer(),
        transport.clone(),
        reporter.clone(),
    );

    let dispatched = core
        .multi_upload(2, "album1", &[glob_for(dir.path())])
        .await
        .expect("per-file failures are not batch failures");
    assert_eq!(dispatched, 5);

    let reports = reporter.reports.lock().expect("lock");
    assert_eq!(reports.len(), 5);
    let failed: Vec<&PathBuf> = reports
        .iter()
        .filter(|(_, r)| r.is_err())
        .map(|(p, _)| p)
        .collect();
    assert_eq!(failed, vec![&dir.path().join("img02.jpg")]);
    assert_eq!(reports.iter().filter(|(_, r)| r.is_ok()).count(), 4);
}

/// Transport that panics mid-send for one file and succeeds for the rest.
#[derive(Default)]
struct PanickingTransport {
    calls: AtomicUsize,
    panic_file: String,
}

#[async_trait]
impl UploadTransport for PanickingTransport {
    async fn send(&self, request: SignedRequest) -> Result<UploadOutcome, UploadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = request
            .body
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name == self.panic_file {
            panic!("transport blew up on {name}");
        }
        Ok(UploadOutcome {
            status_line: "200 OK".to_string(),
            body: String::new(),
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_unit_does_not_stop_the_others() {
    let dir = photo_dir(4);
    let transport = Arc::new(PanickingTransport {
        panic_file: "img01.jpg".to_string(),
        ..PanickingTransport::default()
    });
    let reporter = Arc::new(CollectingReporter::default());
    let core = UploadCore::new(
        good_credentials(),
        Arc::new(GlobMatcher),
        fixed_signer(),
        transport.clone(),
        reporter.clone(),
    );

    // A limit of 1 means the panicking unit must release its slot for the rest to run.
    let dispatched = core
        .multi_upload(1, "album1", &[glob_for(dir.path())])
        .await
        .expect("a panicking unit is not a batch failure");

    assert_eq!(dispatched, 4);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 4);

    let reports = reporter.reports.lock().expect("lock");
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|(_, r)| r.is_ok()));
    assert!(
        !reports
            .iter()
            .any(|(p, _)| p == &dir.path().join("img01.jpg"))
    );
}

#[tokio::test]
async fn missing_file_fails_only_its_own_unit() {
    let dir = photo_dir(2);
    let ghost = dir.path().join("ghost.jpg");
    let listed = vec![
        dir.path().join("img00.jpg"),
        ghost.clone(),
        dir.path().join("img01.jpg"),
    ];

    let mut matcher = MockPatternMatcher::new();
    matcher
        .expect_matches()
        .returning(move |_| Ok(listed.clone()));

    let transport = Arc::new(CountingTransport::default());
    let reporter = Arc::new(CollectingReporter::default());
    let core = UploadCore::new(
        good_credentials(),
        Arc::new(matcher),
        fixed_signer(),
        transport.clone(),
        reporter.clone(),
    );

    let dispatched = core
        .multi_upload(2, "album1", &["anything"])
        .await
        .expect("multi upload");
    assert_eq!(dispatched, 3);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);

    let reports = reporter.reports.lock().expect("lock");
    let ghost_report = reports
        .iter()
        .find(|(p, _)| p == &ghost)
        .expect("ghost file reported");
    assert!(ghost_report.1.is_err());
}

#[tokio::test]
async fn credential_failure_aborts_before_any_upload() {
    let mut store = MockCredentialStore::new();
    store
        .expect_load()
        .times(1)
        .returning(|| Err(UploadError::CredentialLoad("no token file".to_string())));
    let mut matcher = MockPatternMatcher::new();
    matcher.expect_matches().times(0);
    let transport = Arc::new(CountingTransport::default());

    let core = UploadCore::new(
        Arc::new(store),
        Arc::new(matcher),
        fixed_signer(),
        transport.clone(),
        Arc::new(CollectingReporter::default()),
    );

    let result = core.multi_upload(4, "album1", &["*.jpg"]).await;
    assert!(matches!(result, Err(UploadError::CredentialLoad(_))));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn single_upload_headers_match_hashed_content() {
    let dir = photo_dir(1);
    let path = dir.path().join("img00.jpg");
    let digest = calculate_md5(&path).expect("hash");

    let transport = Arc::new(CountingTransport::default());
    let reporter = Arc::new(CollectingReporter::default());
    let core = UploadCore::new(
        good_credentials(),
        Arc::new(MockPatternMatcher::new()),
        fixed_signer(),
        transport.clone(),
        reporter.clone(),
    );

    let outcome = core.upload("album1", &path).await.expect("upload");
    assert_eq!(outcome.status_line, "200 OK");
    assert!(outcome.body.contains("img00.jpg"));

    let requests = transport.requests.lock().expect("lock");
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(
        req.headers.get("Content-Length").expect("length").to_str().expect("ascii"),
        digest.size_bytes.to_string()
    );
    assert_eq!(
        req.headers.get("Content-MD5").expect("md5").to_str().expect("ascii"),
        digest.md5_hex
    );
    assert_eq!(req.body.content_length, digest.size_bytes);
    assert_eq!(
        req.headers.get("X-Smug-AlbumUri").expect("album").to_str().expect("ascii"),
        "/api/v2/album/album1"
    );
    assert_eq!(reporter.reports.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn single_upload_reports_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let transport = Arc::new(CountingTransport::default());
    let reporter = Arc::new(CollectingReporter::default());
    let core = UploadCore::new(
        good_credentials(),
        Arc::new(MockPatternMatcher::new()),
        fixed_signer(),
        transport.clone(),
        reporter.clone(),
    );

    let result = core.upload("album1", &dir.path().join("nope.jpg")).await;
    assert!(matches!(result, Err(UploadError::FileAccess { .. })));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    assert_eq!(reporter.reports.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn nothing_matched_dispatches_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let transport = Arc::new(CountingTransport::default());
    let core = UploadCore::new(
        good_credentials(),
        Arc::new(GlobMatcher),
        fixed_signer(),
        transport.clone(),
        Arc::new(CollectingReporter::default()),
    );

    let dispatched = core
        .multi_upload(2, "album1", &[glob_for(dir.path()), "[bad".to_string()])
        .await
        .expect("multi upload");
    assert_eq!(dispatched, 0);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}
