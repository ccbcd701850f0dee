//! File content upload and download.

pub mod service;

pub use service::{ContentService, Download, Upload};
