//! Tree definition watcher for hot reload.
//!
//! Every file the tree was read from is watched, the root definition and
//! all of its includes. The set is refreshed after each successful reload,
//! so adding or dropping an include adjusts what is watched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::tree::Configuration;

/// A watcher that monitors the tree definition files for changes.
pub struct TreeWatcher {
    path: PathBuf,
    sources: Vec<PathBuf>,
    update_tx: mpsc::UnboundedSender<Configuration>,
}

/// Keeps a running watcher alive. Dropping it stops watching.
#[derive(Debug)]
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TreeWatcher {
    /// Create a new TreeWatcher.
    ///
    /// Returns the watcher and a receiver for reloaded trees.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Configuration>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (Self::with_sender(path, update_tx), update_rx)
    }

    /// Create a watcher feeding an existing channel.
    pub fn with_sender(path: &Path, update_tx: mpsc::UnboundedSender<Configuration>) -> Self {
        Self {
            path: path.to_path_buf(),
            sources: Vec::new(),
            update_tx,
        }
    }

    /// Start from the files of an already loaded tree instead of reading
    /// the definition again.
    pub fn with_sources(mut self, sources: &[PathBuf]) -> Self {
        self.sources = sources.to_vec();
        self
    }

    /// Start watching. Must be called inside a Tokio runtime.
    ///
    /// Parent directories are watched so that editors replacing a file
    /// by rename are noticed too.
    pub fn run(self) -> Result<WatchHandle, notify::Error> {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = event_tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        let mut files = self.initial_sources();
        let mut dirs = HashSet::new();
        for dir in directories(&files) {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
            dirs.insert(dir);
        }
        tracing::info!(path = ?self.path, files = files.len(), "Tree watcher started");

        let path = self.path;
        let tx = self.update_tx;
        let task = tokio::spawn(async move {
            while let Some(res) = event_rx.recv().await {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!("Watch error: {:?}", e);
                        continue;
                    }
                };
                if !is_relevant(&event, &files) {
                    continue;
                }

                tracing::info!(changed = ?event.paths, "Tree definition change detected, reloading...");
                let Some(config) = reload_tree(&path) else {
                    continue;
                };

                files = config.sources().iter().cloned().collect();
                let wanted = directories(&files);
                for dir in dirs.difference(&wanted) {
                    let _ = watcher.unwatch(dir);
                }
                for dir in wanted.difference(&dirs) {
                    if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
                        tracing::warn!(dir = ?dir, error = %e, "Failed to watch include directory");
                    }
                }
                dirs = wanted;

                if tx.send(config).is_err() {
                    break;
                }
            }
        });

        Ok(WatchHandle { task })
    }

    fn initial_sources(&self) -> HashSet<PathBuf> {
        if !self.sources.is_empty() {
            return self.sources.iter().cloned().collect();
        }
        match Configuration::from_path(&self.path) {
            Ok(config) => config.sources().iter().cloned().collect(),
            // Until the definition loads, only the root file is known.
            Err(_) => HashSet::from([self
                .path
                .canonicalize()
                .unwrap_or_else(|_| self.path.clone())]),
        }
    }
}

fn is_relevant(event: &Event, files: &HashSet<PathBuf>) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event.paths.iter().any(|p| {
            files.contains(p) || p.canonicalize().is_ok_and(|c| files.contains(&c))
        })
}

fn directories(files: &HashSet<PathBuf>) -> HashSet<PathBuf> {
    files
        .iter()
        .map(|file| match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        })
        .collect()
}

/// Load a replacement tree, logging instead of failing.
///
/// `None` means the current tree stays in place.
pub fn reload_tree(path: &Path) -> Option<Configuration> {
    match Configuration::from_path(path) {
        Ok(config) => Some(config),
        Err(e) => {
            metrics::record_reload("failed");
            tracing::error!(
                "Failed to reload tree: {}. Keeping current configuration.",
                e
            );
            None
        }
    }
}
