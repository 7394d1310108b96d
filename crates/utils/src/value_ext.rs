use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive.
    ///
    /// ```rust
    /// # use mctools_utils::ValueExt;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.0).sci(5, 2), "1.00000e+00".to_string());
    /// assert_eq!((0.00125).sci(2, 2), "1.25e-03".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Scientific formatting right-aligned to a fixed column width
    ///
    /// Positive values are padded so that they line up with negative ones in
    /// tabulated summaries.
    ///
    /// ```rust
    /// # use mctools_utils::ValueExt;
    /// assert_eq!((1.0).sci_aligned(2, 2), " 1.00e+00".to_string());
    /// assert_eq!((-1.0).sci_aligned(2, 2), "-1.00e+00".to_string());
    /// ```
    fn sci_aligned(&self, precision: usize, exp_pad: usize) -> String {
        let s = self.sci(precision, exp_pad);
        // leading sign, digit, point, 'e', and exponent sign around the digits
        let width = precision + exp_pad + 5;
        f!("{s:>width$}")
    }
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let num = f!("{:.precision$e}", &self, precision = precision);
        // `LowerExp` always writes an 'e', fall back to the raw string regardless
        let Some(idx) = num.find('e') else {
            return num;
        };
        let (mantissa, exp) = num.split_at(idx);
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        f!("{mantissa}e{sign}{exp:0>exp_pad$}")
    }
}
