//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use pixenlarge_core::{Encoding, Raster};
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Run the checks only (default)
    #[default]
    Compare,
    /// Also write checked images to the regout directory
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the index of the current check, the mode and
/// every failure recorded so far.
pub struct RegParams {
    /// Name of the test (e.g., "enlarge")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode comes from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        if mode == RegTestMode::Display {
            let _ = fs::create_dir_all(regout_dir());
        }

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two byte strings for exact equality
    pub fn compare_strings(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.index += 1;

        if expected != actual {
            let first_diff = expected
                .iter()
                .zip(actual)
                .position(|(a, b)| a != b)
                .unwrap_or(expected.len().min(actual.len()));
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}, first difference at byte {}",
                self.test_name,
                self.index,
                expected.len(),
                actual.len(),
                first_diff
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two rasters for identical headers and pixels
    pub fn compare_rasters(&mut self, expected: &Raster, actual: &Raster) -> bool {
        self.index += 1;

        if expected.header() != actual.header() {
            let msg = format!(
                "Failure in {}_reg: raster comparison for index {} - header mismatch\n\
                 expected = {:?}\n\
                 actual   = {:?}",
                self.test_name,
                self.index,
                expected.header(),
                actual.header()
            );
            return self.fail(msg);
        }

        for y in 0..expected.height() {
            for x in 0..expected.width() {
                if expected.pixel(x, y) != actual.pixel(x, y) {
                    let msg = format!(
                        "Failure in {}_reg: raster comparison for index {} - pixel mismatch at ({}, {})",
                        self.test_name, self.index, x, y
                    );
                    return self.fail(msg);
                }
            }
        }

        true
    }

    /// Check that a raster survives encoding and decoding unchanged
    ///
    /// In display mode the encoded image is also written to the regout
    /// directory as `<test>.<index>.<ext>`.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::ImageWrite`] if the raster cannot be encoded
    /// and [`TestError::Io`] if the display copy cannot be saved.
    pub fn write_raster_and_check(
        &mut self,
        raster: &Raster,
        encoding: Encoding,
    ) -> TestResult<bool> {
        let data = pixenlarge_io::write_raster_mem(raster, encoding).map_err(|e| {
            TestError::ImageWrite {
                path: format!("{}.{:02}", self.test_name, self.index + 1),
                message: e.to_string(),
            }
        })?;

        let same = match pixenlarge_io::read_raster_mem(&data) {
            Ok(decoded) => self.compare_rasters(raster, &decoded),
            Err(e) => {
                self.index += 1;
                let msg = format!(
                    "Failure in {}_reg: index {} does not decode: {}",
                    self.test_name, self.index, e
                );
                self.fail(msg)
            }
        };

        if self.display() {
            let local_path = format!(
                "{}/{}.{:02}.{}",
                regout_dir(),
                self.test_name,
                self.index,
                raster.header().format.extension()
            );
            fs::write(&local_path, &data)?;
            eprintln!("Wrote: {}", local_path);
        }

        Ok(same)
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixenlarge_core::RasterHeader;

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(mode, RegTestMode::Compare | RegTestMode::Display));
    }

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.index(), 2);
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_strings() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_strings(b"P4\n", b"P4\n"));
        assert!(!rp.compare_strings(b"P4\n", b"P5\n"));
        assert!(rp.failures()[0].contains("first difference at byte 1"));
    }

    #[test]
    fn test_compare_rasters() {
        let mut rp = RegParams::new("test");
        let a = Raster::new(RasterHeader::pgm(2, 2, 255).unwrap()).unwrap();
        let mut b = a.clone();
        assert!(rp.compare_rasters(&a, &b));
        b.row_samples_mut(1).unwrap()[0] = 9;
        assert!(!rp.compare_rasters(&a, &b));
        let c = Raster::new(RasterHeader::pgm(2, 3, 255).unwrap()).unwrap();
        assert!(!rp.compare_rasters(&a, &c));
        assert_eq!(rp.failures().len(), 2);
    }
}
