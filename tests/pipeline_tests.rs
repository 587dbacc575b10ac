//! End-to-end tests of the ingestion pipeline against in-memory sinks.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use assert_fs::prelude::*;
use async_trait::async_trait;

use mailindex::error::{IndexerError, SinkError};
use mailindex::ingest::{IngestOptions, IngestPipeline, IngestProgress, IngestSummary};
use mailindex::model::EmailRecord;
use mailindex::sink::DocumentSink;

/// Keeps every submitted record.
#[derive(Default)]
struct RecordingSink {
    submitted: Mutex<Vec<(String, EmailRecord)>>,
}

impl RecordingSink {
    fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .submitted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, record)| record.path.clone())
            .collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl DocumentSink for RecordingSink {
    async fn submit(&self, collection: &str, record: &EmailRecord) -> Result<(), SinkError> {
        self.submitted
            .lock()
            .unwrap()
            .push((collection.to_string(), record.clone()));
        Ok(())
    }
}

/// Refuses everything, counting the attempts.
#[derive(Default)]
struct RejectingSink {
    attempts: AtomicU64,
}

#[async_trait]
impl DocumentSink for RejectingSink {
    async fn submit(&self, _collection: &str, _record: &EmailRecord) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Rejected("index is read-only".to_string()))
    }
}

fn maildir_fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("maildir")
}

fn options(workers: usize) -> IngestOptions {
    IngestOptions {
        workers,
        ..IngestOptions::default()
    }
}

fn email(n: usize) -> String {
    format!(
        "Date: Mon, 14 May 2001 16:39:00 -0700\n\
         From: sender{n}@example.com\n\
         To: recipient{n}@example.com\n\
         Subject: message {n}\n\
         \n\
         Body of message {n}.\n"
    )
}

fn totals(summary: &IngestSummary) -> (u64, u64, u64) {
    (summary.indexed, summary.errors, summary.skipped)
}

async fn run(root: &Path, sink: Arc<dyn DocumentSink>, options: IngestOptions) -> IngestSummary {
    IngestPipeline::new(sink, options).run(root).await.unwrap()
}

// ─── Unsupported extensions only: nothing is counted ────────────────

#[tokio::test]
async fn test_unsupported_extensions_are_never_counted() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("slides.pdf").write_str("%PDF-1.4").unwrap();
    temp.child("archive/mail.zip").write_binary(&[0x50, 0x4b, 3, 4]).unwrap();
    temp.child("archive/photo.JPG").write_str("not really").unwrap();

    let sink = Arc::new(RecordingSink::default());
    let summary = run(temp.path(), sink.clone(), options(2)).await;

    assert_eq!(totals(&summary), (0, 0, 0));
    assert!(sink.paths().is_empty());
}

#[tokio::test]
async fn test_dotfiles_are_never_counted() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".DS_Store").write_binary(b"\0\0\0\x01Bud1").unwrap();
    temp.child("inbox/.pdf").write_str("%PDF-1.4").unwrap();

    let sink = Arc::new(RecordingSink::default());
    let summary = run(temp.path(), sink.clone(), options(1)).await;

    assert_eq!(totals(&summary), (0, 0, 0));
    assert!(sink.paths().is_empty());
}

// ─── Fixture maildir ────────────────────────────────────────────────

#[tokio::test]
async fn test_fixture_maildir() {
    let root = maildir_fixture();
    let sink = Arc::new(RecordingSink::default());
    let summary = run(&root, sink.clone(), options(4)).await;

    // Four emails, one draft without headers, one pdf that is never read.
    assert_eq!(totals(&summary), (4, 1, 0));

    let expected: Vec<String> = [
        "allen-p/inbox/1.",
        "allen-p/inbox/2.",
        "allen-p/sent_items/1.",
        "lay-k/notes/meeting.txt",
    ]
    .iter()
    .map(|relative| root.join(relative).to_string_lossy().into_owned())
    .collect();
    assert_eq!(sink.paths(), expected);

    let submitted = sink.submitted.lock().unwrap();
    assert!(submitted.iter().all(|(collection, _)| collection == "emails"));
    let folders: Vec<&str> = submitted.iter().map(|(_, r)| r.folder.as_str()).collect();
    assert!(folders.contains(&"sent_items"));
    assert!(folders.contains(&"notes"));
}

#[tokio::test]
async fn test_records_go_to_configured_collection() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("inbox/1.").write_str(&email(1)).unwrap();

    let sink = Arc::new(RecordingSink::default());
    let options = IngestOptions {
        collection: "enron".to_string(),
        ..options(1)
    };
    run(temp.path(), sink.clone(), options).await;

    let submitted = sink.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].0, "enron");
    assert_eq!(submitted[0].1.sender, "sender1@example.com");
    assert_eq!(submitted[0].1.folder, "inbox");
}

// ─── Totals do not depend on the number of workers ──────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_totals_independent_of_worker_count() {
    let temp = assert_fs::TempDir::new().unwrap();
    for i in 0..250 {
        let dir = format!("user-{}/inbox", i % 7);
        temp.child(format!("{dir}/{i}.")).write_str(&email(i)).unwrap();
    }
    for i in 0..20 {
        temp.child(format!("notes/{i}.txt")).write_str("no headers here").unwrap();
    }
    for i in 0..5 {
        temp.child(format!("empty/{i}.eml")).write_str("").unwrap();
    }
    temp.child("attachments/report.pdf").write_str("%PDF").unwrap();

    let mut results = Vec::new();
    for workers in [1, 2, 8] {
        let sink = Arc::new(RecordingSink::default());
        let options = IngestOptions {
            job_queue_capacity: 3,
            result_queue_capacity: 2,
            ..options(workers)
        };
        let summary = run(temp.path(), sink.clone(), options).await;
        assert_eq!(sink.paths().len(), 250, "workers = {workers}");
        results.push(totals(&summary));
    }

    assert_eq!(results, vec![(250, 25, 5); 3]);
}

// ─── Empty files ────────────────────────────────────────────────────

fn three_emails_one_empty_one_pdf() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    for i in 0..3 {
        temp.child(format!("{i}.txt")).write_str(&email(i)).unwrap();
    }
    temp.child("empty.txt").write_str("").unwrap();
    temp.child("report.pdf").write_str(&email(99)).unwrap();
    temp
}

#[tokio::test]
async fn test_empty_file_counted_as_error_and_skip() {
    let temp = three_emails_one_empty_one_pdf();
    let sink = Arc::new(RecordingSink::default());
    let summary = run(temp.path(), sink.clone(), options(2)).await;

    assert_eq!(totals(&summary), (3, 1, 1));
    temp.child("report.pdf").assert(predicates::path::exists());
    assert!(sink.paths().iter().all(|p| !p.ends_with("report.pdf")));
}

#[tokio::test]
async fn test_empty_file_dropped_when_not_reported() {
    let temp = three_emails_one_empty_one_pdf();
    let sink = Arc::new(RecordingSink::default());
    let options = IngestOptions {
        report_empty: false,
        ..options(2)
    };
    let summary = run(temp.path(), sink, options).await;

    assert_eq!(totals(&summary), (3, 0, 0));
}

// ─── Sink failures ──────────────────────────────────────────────────

#[tokio::test]
async fn test_rejecting_sink_counts_every_email_as_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    for i in 0..12 {
        temp.child(format!("box-{}/{i}.eml", i % 3)).write_str(&email(i)).unwrap();
    }

    let sink = Arc::new(RejectingSink::default());
    let summary = run(temp.path(), sink.clone(), options(3)).await;

    assert_eq!(totals(&summary), (0, 12, 0));
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 12);
}

#[tokio::test]
async fn test_rejecting_sink_on_fixture() {
    let sink = Arc::new(RejectingSink::default());
    let summary = run(&maildir_fixture(), sink.clone(), options(2)).await;

    // Only the four parseable emails reach the sink; the draft fails earlier.
    assert_eq!(totals(&summary), (0, 5, 0));
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 4);
}

// ─── Progress reporting ─────────────────────────────────────────────

#[tokio::test]
async fn test_progress_called_once_per_result() {
    let temp = three_emails_one_empty_one_pdf();
    let calls = AtomicU64::new(0);
    let last = Mutex::new(IngestProgress::default());

    let pipeline = IngestPipeline::new(Arc::new(RecordingSink::default()), options(2));
    let summary = pipeline
        .run_with_progress(
            temp.path(),
            Some(&|progress: &IngestProgress| {
                calls.fetch_add(1, Ordering::SeqCst);
                *last.lock().unwrap() = *progress;
            }),
        )
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    let last = *last.lock().unwrap();
    assert_eq!(
        (last.indexed, last.errors, last.skipped),
        totals(&summary)
    );
}

// ─── Invalid roots ──────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_root_is_fatal() {
    let temp = assert_fs::TempDir::new().unwrap();
    let pipeline = IngestPipeline::new(Arc::new(RecordingSink::default()), options(1));

    let err = pipeline.run(&temp.path().join("missing")).await.unwrap_err();
    assert!(matches!(err, IndexerError::PathNotAccessible { .. }));
}

#[tokio::test]
async fn test_file_root_is_fatal() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("1.txt");
    file.write_str(&email(1)).unwrap();
    let pipeline = IngestPipeline::new(Arc::new(RecordingSink::default()), options(1));

    let err = pipeline.run(file.path()).await.unwrap_err();
    assert!(matches!(err, IndexerError::NotADirectory(_)));
}
