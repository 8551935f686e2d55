//! classaide-report: renders class assessment reports for sharing.

pub mod html;
