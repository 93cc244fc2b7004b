/// Incremental batch execution
///
/// Long operations (batch rename, copy, delete) run one item per scheduling
/// tick so the surrounding event loop stays responsive. `BatchTask` is the
/// generic stepper: it reports (completed, total) after every tick, honors
/// cancellation between items, and collects per-item failures without
/// aborting the rest of the batch. Completed items are permanent —
/// cancellation stops scheduling, it does not roll back.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where a batch stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Running,
    Finished,
    Cancelled,
}

/// Progress snapshot reported after every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub status: BatchStatus,
}

impl BatchProgress {
    /// Completed fraction in 0.0..=1.0 for progress display
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// One file operation that went wrong; the batch continues past it
#[derive(Debug)]
pub struct ItemFailure {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub error: io::Error,
}

/// A batch of items processed one per tick.
///
/// The operation returns the failures of its item (empty = success); they
/// accumulate on the task and never stop the batch.
pub struct BatchTask<T, F>
where
    F: FnMut(&T) -> Vec<ItemFailure>,
{
    items: Vec<T>,
    op: F,
    next: usize,
    cancelled: bool,
    failures: Vec<ItemFailure>,
}

impl<T, F> BatchTask<T, F>
where
    F: FnMut(&T) -> Vec<ItemFailure>,
{
    pub fn new(items: Vec<T>, op: F) -> Self {
        BatchTask {
            items,
            op,
            next: 0,
            cancelled: false,
            failures: Vec::new(),
        }
    }

    /// Request cooperative cancellation; takes effect before the next item
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn progress(&self) -> BatchProgress {
        let status = if self.cancelled && self.next < self.items.len() {
            BatchStatus::Cancelled
        } else if self.next == self.items.len() {
            BatchStatus::Finished
        } else {
            BatchStatus::Running
        };
        BatchProgress {
            completed: self.next,
            total: self.items.len(),
            status,
        }
    }

    /// Process at most one item, then report progress
    pub fn step(&mut self) -> BatchProgress {
        if !self.cancelled && self.next < self.items.len() {
            let failures = (self.op)(&self.items[self.next]);
            for failure in &failures {
                match &failure.destination {
                    Some(dest) => eprintln!(
                        "⚠️  {} -> {}: {}",
                        failure.source.display(),
                        dest.display(),
                        failure.error
                    ),
                    None => eprintln!("⚠️  {}: {}", failure.source.display(), failure.error),
                }
            }
            self.failures.extend(failures);
            self.next += 1;
        }
        self.progress()
    }

    /// Drive the batch to its end in one call (tests, headless use)
    pub fn run_to_completion(&mut self) -> BatchProgress {
        loop {
            let progress = self.step();
            if progress.status != BatchStatus::Running {
                return progress;
            }
        }
    }

    pub fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }
}

/// How a planned pair moves its file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Move,
    Copy,
}

/// Move or copy one file, creating destination directories as needed.
///
/// A move that cannot be done with a plain rename (typically across
/// filesystems) falls back to copy-then-remove.
pub fn transfer_file(source: &Path, destination: &Path, mode: TransferMode) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    match mode {
        TransferMode::Move => match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(_) => {
                fs::copy(source, destination)?;
                fs::remove_file(source)
            }
        },
        TransferMode::Copy => {
            fs::copy(source, destination)?;
            Ok(())
        }
    }
}

/// Execute one planned rename: apply every (source, destination) pair,
/// reporting each failing pair and carrying on with the rest
pub fn apply_plan(plan: &[(PathBuf, PathBuf)], mode: TransferMode) -> Vec<ItemFailure> {
    let mut failures = Vec::new();
    for (source, destination) in plan {
        if let Err(error) = transfer_file(source, destination, mode) {
            failures.push(ItemFailure {
                source: source.clone(),
                destination: Some(destination.clone()),
                error,
            });
        }
    }
    failures
}

/// Delete one image together with its parameter file and the configured
/// sidecars. Missing sidecars are skipped silently; failed removals are
/// reported and do not stop the rest.
pub fn delete_with_sidecars(
    path: &Path,
    sidecar_suffixes: &[String],
    param_file_extension: &str,
) -> Vec<ItemFailure> {
    let mut failures = Vec::new();
    let mut remove = |target: PathBuf| {
        if let Err(error) = fs::remove_file(&target) {
            failures.push(ItemFailure {
                source: target,
                destination: None,
                error,
            });
        }
    };

    remove(path.to_path_buf());

    let name = path.to_string_lossy();
    let param_file = PathBuf::from(format!("{}.{}", name, param_file_extension));
    if param_file.exists() {
        remove(param_file);
    }

    let stem = crate::paths::remove_extension(&name).to_string();
    for suffix in sidecar_suffixes {
        let sidecar = match suffix.strip_prefix('+') {
            Some(tail) => PathBuf::from(format!("{}.{}", name, tail)),
            None => PathBuf::from(format!("{}.{}", stem, suffix)),
        };
        if sidecar.exists() {
            remove(sidecar);
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_item_per_step() {
        let mut seen = Vec::new();
        let mut task = BatchTask::new(vec!["a", "b", "c"], |item: &&str| {
            seen.push(item.to_string());
            Vec::new()
        });

        let p = task.step();
        assert_eq!((p.completed, p.total), (1, 3));
        assert_eq!(p.status, BatchStatus::Running);

        let p = task.step();
        assert_eq!(p.completed, 2);

        let p = task.step();
        assert_eq!(p.status, BatchStatus::Finished);
        assert!((p.fraction() - 1.0).abs() < f64::EPSILON);

        // Further steps are no-ops
        let p = task.step();
        assert_eq!((p.completed, p.status), (3, BatchStatus::Finished));

        drop(task);
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cancel_stops_scheduling() {
        let mut processed = 0;
        let mut task = BatchTask::new(vec![1, 2, 3], |_| {
            processed += 1;
            Vec::new()
        });

        task.step();
        task.cancel();
        let p = task.step();

        assert_eq!(p.status, BatchStatus::Cancelled);
        assert_eq!(p.completed, 1);
        drop(task);
        assert_eq!(processed, 1);
    }

    #[test]
    fn test_failures_are_collected_not_fatal() {
        let mut task = BatchTask::new(vec![1, 2, 3], |item: &i32| {
            if *item == 2 {
                vec![ItemFailure {
                    source: PathBuf::from("two"),
                    destination: None,
                    error: io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
                }]
            } else {
                Vec::new()
            }
        });

        let p = task.run_to_completion();
        assert_eq!(p.status, BatchStatus::Finished);
        assert_eq!(task.failures().len(), 1);
        assert_eq!(task.failures()[0].source, Path::new("two"));
    }

    #[test]
    fn test_transfer_creates_parents_and_moves() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.cr2");
        let dst = tmp.path().join("out/deep/a.cr2");
        fs::write(&src, b"raw").unwrap();

        transfer_file(&src, &dst, TransferMode::Move).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"raw");
    }

    #[test]
    fn test_transfer_copy_keeps_source() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.cr2");
        let dst = tmp.path().join("copy/a.cr2");
        fs::write(&src, b"raw").unwrap();

        transfer_file(&src, &dst, TransferMode::Copy).unwrap();
        assert!(src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"raw");
    }

    #[test]
    fn test_apply_plan_continues_past_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let good_src = tmp.path().join("good.cr2");
        fs::write(&good_src, b"x").unwrap();

        let plan = vec![
            (tmp.path().join("missing.cr2"), tmp.path().join("m2.cr2")),
            (good_src.clone(), tmp.path().join("renamed.cr2")),
        ];
        let failures = apply_plan(&plan, TransferMode::Move);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, tmp.path().join("missing.cr2"));
        assert!(tmp.path().join("renamed.cr2").exists());
    }

    #[test]
    fn test_delete_takes_sidecars_along() {
        let tmp = tempfile::tempdir().unwrap();
        let img = tmp.path().join("img.cr2");
        let arp = tmp.path().join("img.cr2.arp");
        let xmp = tmp.path().join("img.xmp");
        for f in [&img, &arp, &xmp] {
            fs::write(f, b"x").unwrap();
        }

        // "thumb" sidecar does not exist; its absence is not a failure
        let failures =
            delete_with_sidecars(&img, &["xmp".into(), "+thumb".into()], "arp");

        assert!(failures.is_empty());
        assert!(!img.exists());
        assert!(!arp.exists());
        assert!(!xmp.exists());
    }
}
