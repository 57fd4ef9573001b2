//! Restart verification using marker files

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Helper for observing the detached dhcpd restart via marker files
#[derive(Clone)]
pub struct MarkerFileHelper {
    base_dir: PathBuf,
}

impl MarkerFileHelper {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
        }
    }

    pub fn marker_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.marker", name))
    }

    /// Restart command and service name that create the marker when run.
    /// Publish appends the service name, so the marker path is the service.
    pub fn touch_restart(&self, name: &str) -> (Vec<String>, String) {
        (
            vec!["touch".to_string()],
            self.marker_path(name).display().to_string(),
        )
    }

    pub fn marker_exists(&self, name: &str) -> bool {
        self.marker_path(name).exists()
    }

    pub fn remove_marker(&self, name: &str) {
        let _ = std::fs::remove_file(self.marker_path(name));
    }

    /// Wait for a marker file to appear
    pub async fn wait_for_marker(&self, name: &str, timeout: Duration) -> bool {
        let marker_path = self.marker_path(name);
        let start = Instant::now();

        while start.elapsed() < timeout {
            if marker_path.exists() {
                return true;
            }
            sleep(Duration::from_millis(50)).await;
        }

        false
    }
}

#[cfg(test)]
mod tests;
