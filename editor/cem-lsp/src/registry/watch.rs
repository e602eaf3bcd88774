//! Manifest watching and debounced reload
//!
//! File events and generate-pipeline results are both funnelled into a
//! [`ReloadScheduler`], which waits for a quiet period before applying a
//! single coalesced reload to the registry.

use super::ComponentRegistry;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Something that should cause the registry to reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadSignal {
    /// A tracked manifest file changed on disk
    FilesChanged,
    /// The generate pipeline produced a fresh manifest
    Generated(String),
}

/// Channel end used to request reloads
pub type ReloadSender = UnboundedSender<ReloadSignal>;

/// Signals coalesced within one debounce window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadBatch {
    /// Any file change seen
    pub files_changed: bool,
    /// Most recent generated manifest
    pub generated: Option<String>,
    /// Number of signals absorbed
    pub signals: usize,
}

impl ReloadBatch {
    pub fn absorb(&mut self, signal: ReloadSignal) {
        self.signals += 1;
        match signal {
            ReloadSignal::FilesChanged => self.files_changed = true,
            ReloadSignal::Generated(manifest) => self.generated = Some(manifest),
        }
    }

    /// Apply the batch to a registry; failures are logged by the registry
    pub fn apply(self, registry: &ComponentRegistry) {
        if let Some(manifest) = self.generated {
            let _ = registry.set_generated(&manifest);
        }
        if self.files_changed {
            let _ = registry.reload();
        }
    }
}

/// Debounces reload signals on a tokio task
pub struct ReloadScheduler {
    sender: ReloadSender,
    handle: JoinHandle<()>,
}

impl ReloadScheduler {
    /// Spawn a scheduler that hands each settled batch to `apply`
    pub fn spawn<F>(window: Duration, apply: F) -> Self
    where
        F: Fn(ReloadBatch) + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(receiver, window, apply));
        Self { sender, handle }
    }

    /// Spawn a scheduler that reloads `registry`
    pub fn for_registry(registry: Arc<ComponentRegistry>, window: Duration) -> Self {
        Self::spawn(window, move |batch| batch.apply(&registry))
    }

    pub fn sender(&self) -> ReloadSender {
        self.sender.clone()
    }

    /// Queue a signal; false once the scheduler has stopped
    pub fn signal(&self, signal: ReloadSignal) -> bool {
        self.sender.send(signal).is_ok()
    }
}

impl Drop for ReloadScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run<F>(mut receiver: UnboundedReceiver<ReloadSignal>, window: Duration, apply: F)
where
    F: Fn(ReloadBatch),
{
    while let Some(first) = receiver.recv().await {
        let mut batch = ReloadBatch::default();
        batch.absorb(first);

        let closed = loop {
            match tokio::time::timeout(window, receiver.recv()).await {
                Ok(Some(signal)) => batch.absorb(signal),
                Ok(None) => break true,
                Err(_) => break false,
            }
        };

        tracing::debug!(
            "Applying reload after {} signal(s), files_changed={}, generated={}",
            batch.signals,
            batch.files_changed,
            batch.generated.is_some()
        );
        apply(batch);

        if closed {
            break;
        }
    }
}

/// Watches manifest files and signals the scheduler when one changes
pub struct ManifestWatcher {
    /// Debounced watcher
    _debouncer: Debouncer<RecommendedWatcher>,
    /// Watched manifest files
    paths: Vec<PathBuf>,
}

impl ManifestWatcher {
    /// Watch the parent directory of each manifest file
    pub fn new(
        paths: &[PathBuf],
        timeout: Duration,
        sender: ReloadSender,
    ) -> Result<Self, notify::Error> {
        let tracked = paths.to_vec();
        let filter = tracked.clone();

        let mut debouncer = new_debouncer(timeout, move |result: DebounceEventResult| match result {
            Ok(events) => {
                if events.iter().any(|event| is_tracked(&filter, &event.path)) {
                    let _ = sender.send(ReloadSignal::FilesChanged);
                }
            }
            Err(err) => tracing::warn!("Manifest watcher error: {}", err),
        })?;

        let mut dirs: Vec<&Path> = Vec::new();
        for path in &tracked {
            let dir = path.parent().unwrap_or(Path::new("."));
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }

        for dir in dirs {
            debouncer.watcher().watch(dir, RecursiveMode::NonRecursive)?;
        }

        Ok(Self {
            _debouncer: debouncer,
            paths: tracked,
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Whether an event path refers to one of the tracked manifests
fn is_tracked(tracked: &[PathBuf], path: &Path) -> bool {
    tracked.iter().any(|candidate| same_file(candidate, path))
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    if a.file_name() != b.file_name() {
        return false;
    }
    match (a.parent(), b.parent()) {
        (Some(pa), Some(pb)) => match (pa.canonicalize(), pb.canonicalize()) {
            (Ok(ca), Ok(cb)) => ca == cb,
            _ => false,
        },
        _ => false,
    }
}
