pub mod harness;
pub mod marker_files;
pub mod settings_builder;
