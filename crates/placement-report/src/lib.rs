//! placement-report — readiness dashboards.
//!
//! Renders a [`placement_core::report::ReadinessReport`] as a self-contained
//! HTML page.

pub mod html;

pub use html::{generate_html, write_html_report};
