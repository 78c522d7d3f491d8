use assert_matches::assert_matches;
use fileconv::conversion::batch::{run_batch, BatchProgress, FileStatus};
use fileconv::{spawn_batch, BatchEvent, BatchJob, Format};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn three_files(dir: &Path) -> Vec<PathBuf> {
    let first = dir.join("first.csv");
    fs::write(&first, "id,name\n1,Ada\n").unwrap();
    let second = dir.join("second.json");
    fs::write(&second, "{\"id\": 2, \"name\": ").unwrap();
    let third = dir.join("third.txt");
    fs::write(&third, "plain words").unwrap();
    vec![first, second, third]
}

#[test]
fn test_corrupt_file_does_not_abort_batch() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("out");
    let job = BatchJob::new(three_files(tmp.path()), Format::Xml, &out);

    let mut progress = Vec::new();
    let report = run_batch(&job, |event| {
        if let BatchEvent::Progress(p) = event {
            progress.push(p);
        }
    })
    .unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);

    let failed: Vec<usize> = report.failures().map(|o| o.index).collect();
    assert_eq!(failed, vec![1]);
    assert_matches!(
        &report.outcomes[1].status,
        FileStatus::Failed { category: "ParseError", .. }
    );

    assert_eq!(
        fs::read_to_string(out.join("first.xml")).unwrap(),
        "<root><item><id>1</id><name>Ada</name></item></root>"
    );
    assert_eq!(
        fs::read_to_string(out.join("third.xml")).unwrap(),
        "<root>plain words</root>"
    );
    assert!(!out.join("second.xml").exists());

    let last = progress.last().copied().unwrap();
    assert_eq!(last, BatchProgress { completed: 3, total: 3 });
    assert_eq!(last.percent(), 100.0);
}

#[test]
fn test_spawned_batch_streams_events() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("out");
    let sources = three_files(tmp.path());
    let job = BatchJob::new(sources.clone(), Format::Xml, &out);

    let handle = spawn_batch(job);
    let events: Vec<BatchEvent> = handle.events().collect();
    let report = handle.wait().unwrap();

    assert_eq!(events.first(), Some(&BatchEvent::Started { total: 3 }));
    assert_matches!(events.last(), Some(BatchEvent::Finished(r)) if r == &report);

    let started: Vec<PathBuf> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::FileStarted { source, .. } => Some(source.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(started, sources);

    let fractions: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Progress(p) => Some(p.fraction()),
            _ => None,
        })
        .collect();
    assert_eq!(fractions.len(), 3);
    assert!(fractions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(fractions[2], 1.0);

    assert_matches!(
        &report.outcomes[0].status,
        FileStatus::Converted { output } if output == &out.join("first.xml")
    );
}

#[test]
fn test_spawned_batch_reports_rejection() {
    let tmp = tempdir().unwrap();
    let image = tmp.path().join("photo.png");
    let job = BatchJob::new(vec![image], Format::Csv, tmp.path().join("out"));

    let handle = spawn_batch(job);
    let events: Vec<BatchEvent> = handle.events().collect();

    assert_matches!(
        events.as_slice(),
        [BatchEvent::Rejected { category: "CapabilityError", .. }]
    );
    assert_eq!(handle.wait().unwrap_err().category(), "CapabilityError");
}

#[test]
fn test_empty_batch_finishes_immediately() {
    let tmp = tempdir().unwrap();
    let job = BatchJob::new(Vec::new(), Format::Json, tmp.path());

    let report = run_batch(&job, |_| {}).unwrap();
    assert!(report.outcomes.is_empty());
    assert!(report.progress().is_complete());
}

#[test]
fn test_same_stem_does_not_overwrite_earlier_output() {
    let tmp = tempdir().unwrap();
    let table = tmp.path().join("a.csv");
    fs::write(&table, "k\nfrom csv\n").unwrap();
    let notes = tmp.path().join("a.txt");
    fs::write(&notes, "from txt").unwrap();
    let out = tmp.path().join("out");

    let job = BatchJob::new(vec![table, notes], Format::Json, &out);
    let report = run_batch(&job, |_| {}).unwrap();

    assert_matches!(&report.outcomes[0].status, FileStatus::Converted { .. });
    assert_matches!(
        &report.outcomes[1].status,
        FileStatus::Failed { category: "ValidationError", message } if message.contains("already written")
    );
    assert_eq!(
        fs::read_to_string(out.join("a.json")).unwrap(),
        "[\n  {\n    \"k\": \"from csv\"\n  }\n]"
    );
}
