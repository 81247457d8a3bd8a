//! Test helpers for building datasets and seeded record stores on disk.

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::{
    TrafficLevel,
    store::SqliteDeliveryStore,
    test_support::{sample_driver, sample_order, sample_route},
};
use tempfile::TempDir;

use crate::import::Dataset;

pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write file");
}

/// A rested and a fatigued driver, one low-traffic route and two pending
/// orders, one of them high value.
pub(super) fn sample_dataset() -> Dataset {
    Dataset {
        drivers: vec![sample_driver(1, 30.0), sample_driver(2, 60.0)],
        routes: vec![sample_route(1, TrafficLevel::Low, 30.0)],
        orders: vec![sample_order(1, 1, 500.0), sample_order(2, 1, 2000.0)],
    }
}

pub(super) fn write_dataset(path: &Utf8Path, dataset: &Dataset) {
    let payload = serde_json::to_string_pretty(dataset).expect("serialise dataset");
    write_utf8(path, payload.as_bytes());
}

/// Create a database at `root/courier.sqlite` holding [`sample_dataset`].
pub(super) fn seeded_database(root: &Utf8Path) -> Utf8PathBuf {
    let path = root.join("courier.sqlite");
    let dataset = sample_dataset();
    let mut store = SqliteDeliveryStore::open(path.as_std_path()).expect("open store");
    store
        .import(&dataset.drivers, &dataset.routes, &dataset.orders)
        .expect("seed store");
    path
}
