//! Test helpers for writing shopping requests to temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Write `contents` to `path`, panicking on failure.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary directory with a UTF-8 root path.
pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Shopping request with three products at two stores, one duplicated
/// location and one product without a location.
pub(super) const SAMPLE_REQUEST: &str = r#"{
    "products": [
        {"name": "Milk", "store": "Corner Market", "location": {"lat": 0.0, "lng": 0.02}},
        {"name": "Bread", "store": "Bakery", "location": {"lat": 0.0, "lng": 0.01, "address": "1 Oven Lane"}},
        {"name": "Eggs", "store": "Corner Market", "location": {"lat": 0.0, "lng": 0.02}},
        {"name": "Stamps", "store": "Post Office"}
    ],
    "userLocation": {"lat": 0.0, "lng": 0.0}
}"#;
