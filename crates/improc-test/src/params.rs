//! Regression test parameters and operations

use improc_core::BitImage;

use crate::bits_to_ascii;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results with expected values (default)
    #[default]
    Compare,
    /// Compare, and also print intermediate images for inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the state of a regression test: its name, the index of the
/// current check, the mode and every failure recorded so far. Checks do
/// not panic; call [`RegParams::cleanup`] at the end and assert on its
/// result.
pub struct RegParams {
    /// Name of the test (e.g., "label")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

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

    /// Compare two numeric values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
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

    /// Compare two packed images for exact equality
    ///
    /// Reports the first differing pixel in raster order.
    pub fn compare_bits(&mut self, expected: &BitImage, actual: &BitImage) -> bool {
        self.index += 1;

        if expected.dimensions() != actual.dimensions() {
            let msg = format!(
                "Failure in {}_reg: bit image comparison for index {} - \
                 dimension mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.dimensions(),
                actual.dimensions()
            );
            return self.fail(msg);
        }

        if expected.data() == actual.data() {
            return true;
        }

        let (width, height) = expected.dimensions();
        let first = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .find(|&(x, y)| expected.get_pixel(x, y) != actual.get_pixel(x, y));
        let msg = format!(
            "Failure in {}_reg: bit image comparison for index {} - pixel mismatch at {:?}",
            self.test_name, self.index, first
        );
        self.fail(msg)
    }

    /// Compare two label buffers for exact equality
    pub fn compare_labels(&mut self, expected: &[usize], actual: &[usize]) -> bool {
        self.index += 1;

        if expected.len() != actual.len() {
            let msg = format!(
                "Failure in {}_reg: label comparison for index {} - sizes {} vs {}",
                self.test_name,
                self.index,
                expected.len(),
                actual.len()
            );
            return self.fail(msg);
        }

        match expected.iter().zip(actual).position(|(e, a)| e != a) {
            None => true,
            Some(i) => {
                let msg = format!(
                    "Failure in {}_reg: label comparison for index {} - \
                     offset {}: expected {}, actual {}",
                    self.test_name, self.index, i, expected[i], actual[i]
                );
                self.fail(msg)
            }
        }
    }

    /// In display mode, print `img` as text under `title`
    pub fn show_bits(&self, title: &str, img: &BitImage) {
        if self.display() {
            eprintln!("-- {} ({}x{})", title, img.width(), img.height());
            eprint!("{}", bits_to_ascii(img));
        }
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
