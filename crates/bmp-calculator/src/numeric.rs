//! Arithmetic shared by the calculators.
//!
//! Everything here is total: division by zero, empty inputs and non-finite
//! intermediates come back as `None` or `0.0`, never as a panic.

/// Grams in one avoirdupois pound.
pub const GRAMS_PER_POUND: f64 = 453.59237;
/// Pounds in one short ton.
pub const POUNDS_PER_TON: f64 = 2000.0;
/// Square feet in one acre.
pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;
/// Feet in one statute mile.
pub const FEET_PER_MILE: f64 = 5280.0;
/// US gallons in one acre-foot.
pub const GALLONS_PER_ACRE_FOOT: f64 = 325_851.4;
/// Inches in one foot.
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Product of a sequence. The empty product is `1.0`.
pub fn product(values: &[f64]) -> f64 {
    values.iter().product()
}

/// `numerator / denominator`, or `None` when the denominator is zero or the
/// quotient is not finite.
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let quotient = numerator / denominator;
    quotient.is_finite().then_some(quotient)
}

/// `numerator / denominator`, with zero on any degenerate input.
pub fn div_or_zero(numerator: f64, denominator: f64) -> f64 {
    safe_div(numerator, denominator).unwrap_or(0.0)
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    safe_div(values.iter().sum(), values.len() as f64)
}

/// Round half away from zero to `decimals` places.
pub fn precision_round(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

/// `part / whole × 100`, or `0.0` unless `whole` is strictly positive.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { div_or_zero(part, whole) * 100.0 } else { 0.0 }
}

/// `Σ quantity × coefficient`.
pub fn weighted_sum(terms: &[(f64, f64)]) -> f64 {
    terms.iter().map(|(quantity, coefficient)| quantity * coefficient).sum()
}

/// Evaluate a polynomial whose coefficients are listed from the highest
/// degree down to the constant term.
pub fn polynomial(coefficients: &[f64], x: f64) -> f64 {
    let degree = coefficients.len().saturating_sub(1);
    coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| c * x.powi((degree - i) as i32))
        .sum()
}

/// Python-style modulo: the result takes the sign of the divisor. Returns
/// `None` for a zero divisor.
pub fn floor_mod(dividend: f64, divisor: f64) -> Option<f64> {
    if divisor == 0.0 {
        return None;
    }
    let remainder = dividend % divisor;
    if remainder != 0.0 && (remainder < 0.0) != (divisor < 0.0) {
        Some(remainder + divisor)
    } else {
        Some(remainder)
    }
}
