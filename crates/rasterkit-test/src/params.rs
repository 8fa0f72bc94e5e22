//! Regression test parameters and comparisons

use rasterkit_core::PixelBuffer;

/// Regression test state: a named sequence of comparisons whose failures
/// are collected rather than aborting at the first mismatch, so one run
/// reports everything that drifted.
pub struct RegParams {
    /// Name of the test (e.g., "convolve")
    pub test_name: String,
    /// Current comparison index (incremented before each comparison)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters.
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current comparison index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Compare two floating-point values within `delta`.
    ///
    /// Returns `true` when they match; records a failure otherwise.
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
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            false
        } else {
            true
        }
    }

    /// Compare two buffers for exact equality (dimensions, format, pixels).
    pub fn compare_buffers(&mut self, expected: &PixelBuffer, actual: &PixelBuffer) -> bool {
        self.index += 1;

        let same = expected.width() == actual.width()
            && expected.height() == actual.height()
            && expected.format() == actual.format()
            && expected.data() == actual.data();

        if !same {
            let msg = format!(
                "Failure in {}_reg: buffer comparison for index {}\n\
                 expected {}x{} {:?}, actual {}x{} {:?}",
                self.test_name,
                self.index,
                expected.width(),
                expected.height(),
                expected.format(),
                actual.width(),
                actual.height(),
                actual.format()
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
        }
        same
    }

    /// Compare two buffers allowing a per-channel tolerance.
    pub fn compare_buffers_tolerant(
        &mut self,
        expected: &PixelBuffer,
        actual: &PixelBuffer,
        tolerance: u8,
    ) -> bool {
        self.index += 1;

        let mut ok = expected.width() == actual.width()
            && expected.height() == actual.height()
            && expected.format() == actual.format();

        if ok {
            'scan: for y in 0..expected.height() {
                for x in 0..expected.width() {
                    let (er, eg, eb, ea) = expected.get_rgba(x, y).unwrap();
                    let (ar, ag, ab, aa) = actual.get_rgba(x, y).unwrap();
                    for (e, a) in [(er, ar), (eg, ag), (eb, ab), (ea, aa)] {
                        if (e as i32 - a as i32).unsigned_abs() > tolerance as u32 {
                            ok = false;
                            break 'scan;
                        }
                    }
                }
            }
        }

        if !ok {
            let msg = format!(
                "Failure in {}_reg: tolerant buffer comparison for index {} (tolerance {})",
                self.test_name, self.index, tolerance
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
        }
        ok
    }

    /// Finish the test: print a summary and return overall success.
    pub fn cleanup(&self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg ({} comparisons)", self.test_name, self.index);
        } else {
            eprintln!(
                "FAILURE: {}_reg ({} of {} comparisons failed)",
                self.test_name,
                self.failures.len(),
                self.index
            );
        }
        self.success
    }
}
