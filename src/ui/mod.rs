//! User interface module - operator-facing output.
//!
//! Releases run unattended (CI), so there are no prompts; everything here
//! prints. Diagnostics go through `tracing` instead.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_change_set, display_changelog, display_error,
    display_status, display_success, display_version_decision, format_baseline,
};
