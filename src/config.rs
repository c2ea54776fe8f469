use std::env;
use std::path::PathBuf;

use crate::environment::StorageKind;

/// Returns the value of the named environment variable if it exists or panics.
pub fn get_variable(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("must define {} environment variable", name))
}

/// Reads the adapter selection from `BREWLOG_STORAGE`.
pub fn get_storage_kind() -> StorageKind {
    get_variable("BREWLOG_STORAGE")
        .parse()
        .expect("parse BREWLOG_STORAGE as device or browser")
}

/// Reads the on-device data directory from `BREWLOG_DATA_DIR`.
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(get_variable("BREWLOG_DATA_DIR"))
}
