use crate::f;

/// Extends float primitives with tolerant comparisons and formatting
pub trait FloatExt: Sized {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// ```rust
    /// # use ctools_utils::FloatExt;
    /// assert_eq!((-1.0_f64).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!(0.125_f64.sci(3, 2), "1.250e-01".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Equality within an absolute tolerance
    ///
    /// ```rust
    /// # use ctools_utils::FloatExt;
    /// assert!((0.1_f64 + 0.2).approx_eq(0.3, 1e-12));
    /// assert!(!1.0_f64.approx_eq(1.1, 1e-3));
    /// ```
    fn approx_eq(&self, other: Self, tolerance: Self) -> bool;

    /// Snap onto the nearest integer if within `tolerance` of it
    ///
    /// Values further away are returned unchanged.
    ///
    /// ```rust
    /// # use ctools_utils::FloatExt;
    /// assert_eq!(2.0000000001_f64.snap(1e-6), 2.0);
    /// assert_eq!((-0.9999999999_f64).snap(1e-6), -1.0);
    /// assert_eq!(2.3_f64.snap(1e-6), 2.3);
    /// ```
    fn snap(self, tolerance: Self) -> Self;
}

impl FloatExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // Safe to `unwrap` as `num` is guaranteed to contain `'e'`
        let exp = num.split_off(num.find('e').unwrap());
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn approx_eq(&self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }

    fn snap(self, tolerance: Self) -> Self {
        let nearest = self.round();
        if self.approx_eq(nearest, tolerance) {
            nearest
        } else {
            self
        }
    }
}
