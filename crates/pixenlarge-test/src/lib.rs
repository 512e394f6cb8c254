//! pixenlarge-test - Regression test framework for pixenlarge
//!
//! Regression tests record numbered checks in a [`RegParams`] and report
//! every failure at the end instead of stopping at the first one.  Two
//! modes are supported:
//!
//! - **Compare**: Run the checks (default)
//! - **Display**: Run the checks and also write each checked image to
//!   `tests/regout/` for inspection
//!
//! # Usage
//!
//! ```ignore
//! use pixenlarge_test::{RegParams, load_test_image};
//!
//! let mut rp = RegParams::new("enlarge");
//! let raster = load_test_image("dots.pbm").unwrap();
//! rp.compare_values(12.0, raster.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use pixenlarge_core::Raster;

/// Load a test image from the test data directory
///
/// # Arguments
///
/// * `name` - Image filename (e.g., "dots.pbm")
pub fn load_test_image(name: &str) -> TestResult<Raster> {
    let path = test_data_path(name);
    pixenlarge_io::read_raster_file(&path).map_err(|e| TestError::ImageLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Read the raw bytes of a test data file
pub fn load_test_bytes(name: &str) -> TestResult<Vec<u8>> {
    Ok(std::fs::read(test_data_path(name))?)
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // pixenlarge-test is at crates/pixenlarge-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a test data file
pub fn test_data_path(name: &str) -> String {
    format!("{}/tests/data/images/{}", workspace_root(), name)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
