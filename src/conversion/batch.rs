//! Batch conversion: many files, one target format
//!
//! Files are converted strictly in input order. A failing file is recorded
//! in the report and the batch moves on to the next one. Only problems that
//! affect the whole batch (invalid settings, a source that cannot be
//! converted to the target at all) reject it before any file is touched.

use crate::conversion::config::ConversionSettings;
use crate::conversion::engine::{ensure_convertible, source_format, ConversionEngine};
use crate::conversion::output::output_path;
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::formats::Format;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// A batch submitted for conversion
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub sources: Vec<PathBuf>,
    pub target: Format,
    pub settings: ConversionSettings,
    pub output_dir: PathBuf,
}

impl BatchJob {
    pub fn new(sources: Vec<PathBuf>, target: Format, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            target,
            settings: ConversionSettings::default(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_settings(mut self, settings: ConversionSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Files attempted so far out of the batch total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    /// Progress in [0, 1]; an empty batch counts as done
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Progress in [0, 100]
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Terminal status of one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Converted { output: PathBuf },
    Failed { category: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    /// Position of the file in the batch
    pub index: usize,
    pub source: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Converted { .. })
    }
}

/// Per-file results of a finished batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub target: Format,
    pub outcomes: Vec<FileOutcome>,
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn progress(&self) -> BatchProgress {
        BatchProgress {
            completed: self.outcomes.len(),
            total: self.outcomes.len(),
        }
    }
}

/// Notifications emitted while a batch runs
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Started { total: usize },
    FileStarted { index: usize, source: PathBuf },
    FileFinished(FileOutcome),
    Progress(BatchProgress),
    Finished(BatchReport),
    Rejected { category: &'static str, message: String },
}

/// Runs batches sequentially on the calling thread
#[derive(Debug, Clone)]
pub struct BatchRunner {
    engine: ConversionEngine,
}

impl BatchRunner {
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            engine: ConversionEngine::new(settings),
        }
    }

    /// Check every source against the capability map before any I/O
    pub fn check_capabilities(sources: &[PathBuf], target: Format) -> ConversionResult<()> {
        for source in sources {
            ensure_convertible(source_format(source)?, target)?;
        }
        Ok(())
    }

    /// Convert every source in order, reporting through `on_event`.
    ///
    /// Returns `Err` only when the whole batch is rejected up front.
    pub fn run<F>(
        &self,
        sources: &[PathBuf],
        target: Format,
        output_dir: &Path,
        mut on_event: F,
    ) -> ConversionResult<BatchReport>
    where
        F: FnMut(BatchEvent),
    {
        let start_time = Instant::now();
        Self::check_capabilities(sources, target)?;

        let total = sources.len();
        on_event(BatchEvent::Started { total });
        tracing::info!(files = total, target = %target, "starting batch conversion");

        let mut outcomes = Vec::with_capacity(total);
        let mut written: HashSet<PathBuf> = HashSet::new();

        for (index, source) in sources.iter().enumerate() {
            on_event(BatchEvent::FileStarted {
                index,
                source: source.clone(),
            });

            let status = match self.convert_one(source, target, output_dir, &written) {
                Ok(output) => {
                    written.insert(output.clone());
                    FileStatus::Converted { output }
                }
                Err(err) => {
                    tracing::error!(
                        source = %source.display(),
                        category = err.category(),
                        error = %err.user_message(),
                        "conversion failed"
                    );
                    FileStatus::Failed {
                        category: err.category(),
                        message: err.user_message(),
                    }
                }
            };

            let outcome = FileOutcome {
                index,
                source: source.clone(),
                status,
            };
            outcomes.push(outcome.clone());
            on_event(BatchEvent::FileFinished(outcome));
            on_event(BatchEvent::Progress(BatchProgress {
                completed: index + 1,
                total,
            }));
        }

        let report = BatchReport {
            target,
            outcomes,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_ms = report.elapsed_ms,
            "batch finished"
        );
        on_event(BatchEvent::Finished(report.clone()));

        Ok(report)
    }

    /// Convert one file unless an earlier file of the batch already wrote
    /// the same output path
    fn convert_one(
        &self,
        source: &Path,
        target: Format,
        output_dir: &Path,
        written: &HashSet<PathBuf>,
    ) -> ConversionResult<PathBuf> {
        let destination = output_path(source, output_dir, target)?;
        if written.contains(&destination) {
            tracing::warn!(
                source = %source.display(),
                output = %destination.display(),
                "output name collides with an earlier file in this batch"
            );
            return Err(ConversionError::conversion(ConversionErrorKind::validation(
                format!(
                    "{} was already written by an earlier file in this batch",
                    destination.display()
                ),
                Some(source.to_path_buf()),
            )));
        }

        self.engine.convert_and_write(source, target, output_dir)
    }
}

/// Validate a job's settings and run it on the calling thread
pub fn run_batch<F>(job: &BatchJob, mut on_event: F) -> ConversionResult<BatchReport>
where
    F: FnMut(BatchEvent),
{
    let result = job
        .settings
        .validate()
        .map_err(|e| ConversionError::conversion(ConversionErrorKind::configuration(e)))
        .and_then(|_| {
            BatchRunner::new(job.settings.clone()).run(
                &job.sources,
                job.target,
                &job.output_dir,
                &mut on_event,
            )
        });

    if let Err(err) = &result {
        tracing::error!(error = %err.user_message(), "batch rejected");
        on_event(BatchEvent::Rejected {
            category: err.category(),
            message: err.user_message(),
        });
    }

    result
}

/// A batch running on its own worker thread
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    worker: JoinHandle<ConversionResult<BatchReport>>,
}

impl BatchHandle {
    /// Blocking iterator over events; ends once the worker is done
    pub fn events(&self) -> impl Iterator<Item = BatchEvent> + '_ {
        self.events.iter()
    }

    /// Wait for the worker and return its result
    pub fn wait(self) -> ConversionResult<BatchReport> {
        self.worker
            .join()
            .map_err(|_| ConversionError::other(anyhow::anyhow!("batch worker panicked")))?
    }
}

/// Run a batch on a dedicated thread, streaming events over a channel
pub fn spawn_batch(job: BatchJob) -> BatchHandle {
    let (tx, rx) = mpsc::channel::<BatchEvent>();

    let worker = thread::spawn(move || {
        run_batch(&job, |event| {
            // The receiver may have been dropped; the batch still runs to completion
            let _ = tx.send(event);
        })
    });

    BatchHandle { events: rx, worker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_progress_fraction() {
        let p = BatchProgress { completed: 1, total: 4 };
        assert_eq!(p.fraction(), 0.25);
        assert_eq!(p.percent(), 25.0);
        assert!(BatchProgress { completed: 0, total: 0 }.is_complete());
    }

    #[test]
    fn test_capability_mismatch_rejects_whole_batch() {
        let tmp = tempdir().unwrap();
        let good = tmp.path().join("a.csv");
        fs::write(&good, "x\n1\n").unwrap();
        let image = tmp.path().join("b.png");

        let job = BatchJob::new(vec![good, image], Format::Json, tmp.path().join("out"));
        let mut events = Vec::new();
        let err = run_batch(&job, |e| events.push(e)).unwrap_err();

        assert_eq!(err.category(), "CapabilityError");
        assert!(!tmp.path().join("out").exists());
        assert!(matches!(events.as_slice(), [BatchEvent::Rejected { .. }]));
    }

    #[test]
    fn test_invalid_settings_reject_batch() {
        let tmp = tempdir().unwrap();
        let settings = ConversionSettings::default().with_xml_root_tag("");
        let job = BatchJob::new(vec![], Format::Xml, tmp.path()).with_settings(settings);
        assert_eq!(
            run_batch(&job, |_| {}).unwrap_err().category(),
            "ConfigurationError"
        );
    }

    #[test]
    fn test_events_in_order() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a.txt");
        fs::write(&a, "one").unwrap();
        let b = tmp.path().join("b.txt");
        fs::write(&b, "two").unwrap();

        let job = BatchJob::new(vec![a.clone(), b.clone()], Format::Json, tmp.path().join("out"));
        let mut events = Vec::new();
        let report = run_batch(&job, |e| events.push(e)).unwrap();

        assert!(report.all_succeeded());
        assert_eq!(events.first(), Some(&BatchEvent::Started { total: 2 }));
        let progress: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Progress(p) => Some(p.completed),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![1, 2]);
        assert!(matches!(events.last(), Some(BatchEvent::Finished(_))));
        assert_eq!(
            fs::read_to_string(tmp.path().join("out/b.json")).unwrap(),
            "\"two\""
        );
    }
}
