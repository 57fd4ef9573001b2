use super::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_wait_for_marker() {
    let temp_dir = TempDir::new().unwrap();
    let marker = MarkerFileHelper::new(temp_dir.path());

    assert!(!marker.wait_for_marker("restart", Duration::from_millis(100)).await);
    std::fs::write(marker.marker_path("restart"), "").unwrap();
    assert!(marker.wait_for_marker("restart", Duration::from_millis(100)).await);

    marker.remove_marker("restart");
    assert!(!marker.marker_exists("restart"));
}

#[test]
fn test_touch_restart_targets_marker() {
    let temp_dir = TempDir::new().unwrap();
    let marker = MarkerFileHelper::new(temp_dir.path());

    let (command, service) = marker.touch_restart("restart");
    assert_eq!(command, vec!["touch"]);
    assert_eq!(PathBuf::from(service), marker.marker_path("restart"));
}
