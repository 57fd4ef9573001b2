//! Test utilities for the ztp workspace
//!
//! Builders for settings and host records, a harness that runs both actors
//! against a temp directory, and marker files for observing the detached
//! service restart.

pub mod helpers;

pub use helpers::harness::TestZtpHarness;
pub use helpers::marker_files::MarkerFileHelper;
pub use helpers::settings_builder::{TestHostBuilder, TestSettingsBuilder};
