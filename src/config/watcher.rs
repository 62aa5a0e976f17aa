//! Route file watcher for hot reload.
//!
//! # Design Decisions
//! - Watches the containing directory; a rename over the route file counts
//!   as a change
//! - Events are filtered down to the route file's name
//! - Only configurations that load and validate are forwarded

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Watches the route file and forwards each valid revision.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its update channel.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching on notify's background thread.
    ///
    /// Updates stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let directory = watched_directory(&self.path);
        let file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| {
                notify::Error::generic("route file path has no file name")
                    .add_path(self.path.clone())
            })?;

        let path = self.path.clone();
        let tx = self.update_tx;
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches_file(&event, &file_name) => reload(&path, &tx),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Route file watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?self.path, directory = ?directory, "Route file watcher started");
        Ok(watcher)
    }
}

fn watched_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn touches_file(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

fn reload(path: &Path, tx: &mpsc::UnboundedSender<RouterConfig>) {
    tracing::info!(path = ?path, "Route file changed, reloading");
    match load_config(path) {
        Ok(config) => {
            if tx.send(config).is_err() {
                tracing::debug!("Route update receiver dropped");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Route file rejected, keeping current table");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tokio::time::{timeout, Instant};

    fn routes(names: &[&str]) -> String {
        names
            .iter()
            .map(|name| format!("[[routes]]\nname = \"{name}\"\n"))
            .collect()
    }

    fn save_atomically(path: &Path, content: &str) {
        let staging = path.with_extension("toml.tmp");
        fs::write(&staging, content).unwrap();
        fs::rename(&staging, path).unwrap();
    }

    /// Collect route-name lists until one equals `expected` or ten seconds pass.
    async fn receive_until(
        rx: &mut mpsc::UnboundedReceiver<RouterConfig>,
        expected: &[&str],
    ) -> Vec<Vec<String>> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut seen = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Ok(Some(config)) = timeout(remaining, rx.recv()).await else {
                break;
            };
            let names: Vec<String> = config.routes.into_iter().map(|r| r.name).collect();
            let done = names == expected;
            seen.push(names);
            if done {
                break;
            }
        }
        seen
    }

    #[test]
    fn test_watched_directory() {
        assert_eq!(watched_directory(Path::new("routes.toml")), PathBuf::from("."));
        assert_eq!(
            watched_directory(Path::new("/etc/router/routes.toml")),
            PathBuf::from("/etc/router")
        );
    }

    #[test]
    fn test_events_filtered_by_file_name() {
        let name = OsString::from("routes.toml");
        let hit = Event::new(EventKind::Create(notify::event::CreateKind::File))
            .add_path(PathBuf::from("/tmp/x/routes.toml"));
        let other = Event::new(EventKind::Create(notify::event::CreateKind::File))
            .add_path(PathBuf::from("/tmp/x/routes.toml.tmp"));
        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("/tmp/x/routes.toml"));

        assert!(touches_file(&hit, &name));
        assert!(!touches_file(&other, &name));
        assert!(!touches_file(&access, &name));
    }

    #[tokio::test]
    async fn test_reloads_survive_repeated_atomic_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        fs::write(&path, routes(&["a"])).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _handle = watcher.run().unwrap();

        save_atomically(&path, &routes(&["a", "b"]));
        let seen = receive_until(&mut rx, &["a", "b"]).await;
        assert_eq!(seen.last(), Some(&vec!["a".to_string(), "b".to_string()]));

        save_atomically(&path, &routes(&["a", "c"]));
        let seen = receive_until(&mut rx, &["a", "c"]).await;
        assert_eq!(seen.last(), Some(&vec!["a".to_string(), "c".to_string()]));
    }

    #[tokio::test]
    async fn test_invalid_revision_is_not_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        fs::write(&path, routes(&["a"])).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _handle = watcher.run().unwrap();

        save_atomically(&path, &routes(&["dup", "dup"]));
        save_atomically(&path, &routes(&["b"]));
        let seen = receive_until(&mut rx, &["b"]).await;
        assert_eq!(seen.last(), Some(&vec!["b".to_string()]));
        assert!(seen.iter().all(|names| !names.contains(&"dup".to_string())));
    }
}
