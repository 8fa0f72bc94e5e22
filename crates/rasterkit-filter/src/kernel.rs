//! Convolution kernels
//!
//! [`Kernel`] is an immutable value object describing a convolution:
//! integer coefficient grid, divisor, offset (bias added after scaling),
//! and the anchor cell that aligns with the output pixel. Kernels are
//! constructed from explicit fields, from the named factory functions, or
//! by parsing the plain-text kernel file format:
//!
//! ```text
//! <rows> <cols>
//! <row 0: cols integers>
//! ...
//! <row rows-1: cols integers>
//! <divisor>
//! <offset>
//! <anchorRow> <anchorCol>
//! ```
//!
//! All tokens are whitespace/newline delimited. [`Kernel::to_text`] writes
//! the same layout back, so parse/serialize round-trips are lossless.
//!
//! A kernel is a dumb data carrier: it stores whatever divisor it was given
//! (including 0, which a hand-edited file may contain); the convolution
//! engine rejects a zero divisor at application time.

use crate::{FilterError, FilterResult};
use std::fmt::Write as _;
use std::path::Path;

/// A 2D integer convolution kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    rows: u32,
    cols: u32,
    /// Coefficients in row-major order; `coeffs.len() == rows * cols`.
    coeffs: Vec<i32>,
    divisor: i32,
    offset: i32,
    anchor_row: u32,
    anchor_col: u32,
}

impl Kernel {
    /// Create a kernel from a coefficient grid and explicit dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if the grid does not have
    /// exactly `rows` rows of `cols` coefficients each, if either dimension
    /// is 0, or if the anchor falls outside the grid.
    pub fn new(
        rows: u32,
        cols: u32,
        grid: &[Vec<i32>],
        divisor: i32,
        offset: i32,
        anchor_row: u32,
        anchor_col: u32,
    ) -> FilterResult<Self> {
        if grid.len() != rows as usize {
            return Err(FilterError::InvalidKernel(format!(
                "declared {} rows but grid has {}",
                rows,
                grid.len()
            )));
        }
        for (r, row) in grid.iter().enumerate() {
            if row.len() != cols as usize {
                return Err(FilterError::InvalidKernel(format!(
                    "declared {} cols but row {} has {}",
                    cols,
                    r,
                    row.len()
                )));
            }
        }
        let coeffs: Vec<i32> = grid.iter().flatten().copied().collect();
        Self::from_flat(rows, cols, coeffs, divisor, offset, anchor_row, anchor_col)
    }

    /// Create a kernel from row-major coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] on a dimension/length
    /// mismatch or an out-of-range anchor.
    pub fn from_flat(
        rows: u32,
        cols: u32,
        coeffs: Vec<i32>,
        divisor: i32,
        offset: i32,
        anchor_row: u32,
        anchor_col: u32,
    ) -> FilterResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "dimensions must be at least 1x1, got {rows}x{cols}"
            )));
        }
        let expected = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or_else(|| FilterError::InvalidKernel(format!("{rows}x{cols} overflows")))?;
        if coeffs.len() != expected {
            return Err(FilterError::InvalidKernel(format!(
                "{}x{} kernel needs {} coefficients, got {}",
                rows,
                cols,
                expected,
                coeffs.len()
            )));
        }
        if anchor_row >= rows || anchor_col >= cols {
            return Err(FilterError::InvalidKernel(format!(
                "anchor ({anchor_row}, {anchor_col}) outside {rows}x{cols} grid"
            )));
        }
        Ok(Kernel {
            rows,
            cols,
            coeffs,
            divisor,
            offset,
            anchor_row,
            anchor_col,
        })
    }

    /// Parse a kernel from the plain-text format.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Parse`] when a token is missing or not an
    /// integer, and [`FilterError::InvalidKernel`] when the parsed fields
    /// are structurally inconsistent (e.g. an out-of-range anchor).
    pub fn parse(text: &str) -> FilterResult<Self> {
        let mut tokens = Tokens::new(text);
        let rows = tokens.dimension("rows")?;
        let cols = tokens.dimension("cols")?;

        let count = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or_else(|| FilterError::InvalidKernel(format!("{rows}x{cols} overflows")))?;
        let mut coeffs = Vec::with_capacity(count);
        for r in 0..rows {
            for c in 0..cols {
                coeffs.push(tokens.int(&format!("coefficient ({r}, {c})"))?);
            }
        }

        let divisor = tokens.int("divisor")?;
        let offset = tokens.int("offset")?;
        let anchor_row = tokens.index("anchorRow")?;
        let anchor_col = tokens.index("anchorCol")?;

        Self::from_flat(rows, cols, coeffs, divisor, offset, anchor_row, anchor_col)
    }

    /// Read and parse a kernel file.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Io`] when the file cannot be read and the
    /// errors of [`Kernel::parse`] otherwise. Substituting a built-in
    /// kernel on failure is caller policy; this function never does.
    pub fn load(path: impl AsRef<Path>) -> FilterResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Serialize to the plain-text format.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", self.rows, self.cols);
        for row in self.coeffs.chunks(self.cols as usize) {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            let _ = writeln!(out, "{}", line.join(" "));
        }
        let _ = writeln!(out, "{}", self.divisor);
        let _ = writeln!(out, "{}", self.offset);
        let _ = writeln!(out, "{} {}", self.anchor_row, self.anchor_col);
        out
    }

    /// Write the kernel file.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Io`] when the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> FilterResult<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Number of kernel rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of kernel columns.
    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Row-major coefficients.
    #[inline]
    pub fn coefficients(&self) -> &[i32] {
        &self.coeffs
    }

    /// Normalization divisor (may be 0 in a kernel loaded from a file;
    /// the convolution engine rejects it).
    #[inline]
    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    /// Bias added after dividing the weighted sum.
    #[inline]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Row of the anchor cell.
    #[inline]
    pub fn anchor_row(&self) -> u32 {
        self.anchor_row
    }

    /// Column of the anchor cell.
    #[inline]
    pub fn anchor_col(&self) -> u32 {
        self.anchor_col
    }

    /// Coefficient at (row, col), or `None` when out of range.
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> Option<i32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.coeffs[(row * self.cols + col) as usize])
    }

    /// Sum of all coefficients.
    pub fn coefficient_sum(&self) -> i64 {
        self.coeffs.iter().map(|&v| v as i64).sum()
    }

    /// Divisor derived from the coefficient sum, substituting 1 when the
    /// sum is 0 (the usual choice for a kernel editor's "compute divisor"
    /// action, since edge and emboss kernels sum to 0).
    pub fn coefficient_sum_divisor(&self) -> i32 {
        let sum = self.coefficient_sum();
        if sum == 0 {
            1
        } else {
            sum.clamp(i32::MIN as i64, i32::MAX as i64) as i32
        }
    }

    // --- Named kernels -----------------------------------------------

    /// 3x3 box blur: all ones, divisor 9, center anchor.
    pub fn box_blur_3() -> Self {
        Self::from_flat(3, 3, vec![1; 9], 9, 0, 1, 1).unwrap()
    }

    /// 5x5 Gaussian approximation, divisor 64, center anchor.
    pub fn gaussian_5() -> Self {
        #[rustfmt::skip]
        let coeffs = vec![
            0, 1,  2, 1, 0,
            1, 4,  8, 4, 1,
            2, 8, 16, 8, 2,
            1, 4,  8, 4, 1,
            0, 1,  2, 1, 0,
        ];
        Self::from_flat(5, 5, coeffs, 64, 0, 2, 2).unwrap()
    }

    /// 3x3 sharpening kernel, divisor 1, center anchor.
    pub fn sharpen_3() -> Self {
        #[rustfmt::skip]
        let coeffs = vec![
             0, -1,  0,
            -1,  5, -1,
             0, -1,  0,
        ];
        Self::from_flat(3, 3, coeffs, 1, 0, 1, 1).unwrap()
    }

    /// 3x3 Laplacian edge detector, divisor 1, center anchor.
    pub fn edge_detect_3() -> Self {
        #[rustfmt::skip]
        let coeffs = vec![
            -1, -1, -1,
            -1,  8, -1,
            -1, -1, -1,
        ];
        Self::from_flat(3, 3, coeffs, 1, 0, 1, 1).unwrap()
    }

    /// 3x3 emboss kernel, divisor 1, offset 128, center anchor.
    ///
    /// The 128 offset re-centers the signed gradient so a zero-gradient
    /// region comes out mid-gray.
    pub fn emboss_3() -> Self {
        #[rustfmt::skip]
        let coeffs = vec![
            -2, -1, 0,
            -1,  1, 1,
             0,  1, 2,
        ];
        Self::from_flat(3, 3, coeffs, 1, 128, 1, 1).unwrap()
    }
}

/// Whitespace token reader for the kernel file format.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            iter: text.split_whitespace(),
            position: 0,
        }
    }

    fn int(&mut self, what: &str) -> FilterResult<i32> {
        self.position += 1;
        let token = self.iter.next().ok_or_else(|| {
            FilterError::Parse(format!("missing {what} (token {})", self.position))
        })?;
        token.parse::<i32>().map_err(|_| {
            FilterError::Parse(format!(
                "invalid {what}: '{token}' is not an integer (token {})",
                self.position
            ))
        })
    }

    /// A dimension token: integer, at least 1.
    fn dimension(&mut self, what: &str) -> FilterResult<u32> {
        let value = self.int(what)?;
        u32::try_from(value)
            .ok()
            .filter(|&v| v >= 1)
            .ok_or_else(|| FilterError::Parse(format!("invalid {what}: {value} (must be >= 1)")))
    }

    /// A non-negative index token (anchor coordinate).
    fn index(&mut self, what: &str) -> FilterResult<u32> {
        let value = self.int(what)?;
        u32::try_from(value)
            .map_err(|_| FilterError::Parse(format!("invalid {what}: {value} (must be >= 0)")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_grid_shape() {
        let grid = vec![vec![1, 2], vec![3, 4]];
        assert!(Kernel::new(2, 2, &grid, 1, 0, 0, 0).is_ok());
        assert!(matches!(
            Kernel::new(3, 2, &grid, 1, 0, 0, 0),
            Err(FilterError::InvalidKernel(_))
        ));
        let ragged = vec![vec![1, 2], vec![3]];
        assert!(matches!(
            Kernel::new(2, 2, &ragged, 1, 0, 0, 0),
            Err(FilterError::InvalidKernel(_))
        ));
    }

    #[test]
    fn test_anchor_must_be_inside_grid() {
        let grid = vec![vec![1, 1, 1]];
        assert!(Kernel::new(1, 3, &grid, 3, 0, 0, 2).is_ok());
        assert!(matches!(
            Kernel::new(1, 3, &grid, 3, 0, 1, 0),
            Err(FilterError::InvalidKernel(_))
        ));
        assert!(matches!(
            Kernel::new(1, 3, &grid, 3, 0, 0, 3),
            Err(FilterError::InvalidKernel(_))
        ));
    }

    #[test]
    fn test_zero_divisor_is_stored() {
        // The kernel is a dumb carrier; rejection happens at convolve time
        let k = Kernel::from_flat(1, 1, vec![1], 0, 0, 0, 0).unwrap();
        assert_eq!(k.divisor(), 0);
    }

    #[test]
    fn test_parse_minimal() {
        let k = Kernel::parse("1 1\n5\n2\n7\n0 0\n").unwrap();
        assert_eq!(k.rows(), 1);
        assert_eq!(k.cols(), 1);
        assert_eq!(k.coefficients(), &[5]);
        assert_eq!(k.divisor(), 2);
        assert_eq!(k.offset(), 7);
        assert_eq!((k.anchor_row(), k.anchor_col()), (0, 0));
    }

    #[test]
    fn test_parse_blur() {
        let text = "3 3\n1 1 1\n1 1 1\n1 1 1\n9\n0\n1 1\n";
        assert_eq!(Kernel::parse(text).unwrap(), Kernel::box_blur_3());
    }

    #[test]
    fn test_parse_token_spacing_is_free() {
        // Any whitespace/newline layout carries the same token stream
        let k = Kernel::parse("  2\t2 1 2\n3 4\n 4\n0\n0   1").unwrap();
        assert_eq!(k.coefficients(), &[1, 2, 3, 4]);
        assert_eq!((k.anchor_row(), k.anchor_col()), (0, 1));
    }

    #[test]
    fn test_parse_missing_token() {
        let err = Kernel::parse("3 3\n1 1 1\n1 1 1\n1 1\n").unwrap_err();
        assert!(matches!(err, FilterError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_parse_non_numeric_token() {
        let err = Kernel::parse("2 2\n1 x\n3 4\n1\n0\n0 0\n").unwrap_err();
        match err {
            FilterError::Parse(msg) => assert!(msg.contains("'x'"), "{msg}"),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_bad_dimensions() {
        assert!(Kernel::parse("0 3\n1\n0\n0 0\n").is_err());
        assert!(Kernel::parse("-1 3\n1\n0\n0 0\n").is_err());
    }

    #[test]
    fn test_parse_anchor_out_of_range() {
        let err = Kernel::parse("1 1\n1\n1\n0\n0 1\n").unwrap_err();
        assert!(matches!(err, FilterError::InvalidKernel(_)), "got {err:?}");
    }

    #[test]
    fn test_text_round_trip() {
        let k = Kernel::emboss_3();
        let reparsed = Kernel::parse(&k.to_text()).unwrap();
        assert_eq!(reparsed, k);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Kernel::load("/nonexistent/kernel.flt").unwrap_err();
        assert!(matches!(err, FilterError::Io(_)), "got {err:?}");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("rasterkit_kernel_roundtrip.flt");
        let k = Kernel::gaussian_5();
        k.save(&path).unwrap();
        let loaded = Kernel::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, k);
    }

    #[test]
    fn test_coefficient_sum_divisor() {
        assert_eq!(Kernel::box_blur_3().coefficient_sum_divisor(), 9);
        assert_eq!(Kernel::gaussian_5().coefficient_sum_divisor(), 64);
        // Edge kernel sums to 0, so the computed divisor falls back to 1
        assert_eq!(Kernel::edge_detect_3().coefficient_sum_divisor(), 1);
    }

    #[test]
    fn test_named_kernels_are_centered() {
        for k in [
            Kernel::box_blur_3(),
            Kernel::sharpen_3(),
            Kernel::edge_detect_3(),
            Kernel::emboss_3(),
        ] {
            assert_eq!((k.anchor_row(), k.anchor_col()), (1, 1));
        }
        let g = Kernel::gaussian_5();
        assert_eq!((g.anchor_row(), g.anchor_col()), (2, 2));
    }

    #[test]
    fn test_get() {
        let k = Kernel::sharpen_3();
        assert_eq!(k.get(1, 1), Some(5));
        assert_eq!(k.get(0, 1), Some(-1));
        assert_eq!(k.get(3, 0), None);
    }
}
