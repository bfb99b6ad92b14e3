//! Formatting and statistics helpers shared by every panel
//!
//! Pure functions only: currency and number formatting, Pearson
//! correlation, least-squares trend line and the price colour gradient.

/// Least-squares line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Pearson correlation coefficient over the first `min(len)` pairs.
/// Returns 0.0 for empty input or when either side has zero variance.
pub fn calc_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x[..n].iter().zip(&y[..n]) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

/// Ordinary least squares fit; slope and intercept are 0 below two points
pub fn calc_trend_line(x: &[f64], y: &[f64]) -> TrendLine {
    let n = x.len().min(y.len());
    if n < 2 {
        return TrendLine::default();
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut den = 0.0;
    for (xi, yi) in x[..n].iter().zip(&y[..n]) {
        num += (xi - mean_x) * (yi - mean_y);
        den += (xi - mean_x).powi(2);
    }

    let slope = if den == 0.0 { 0.0 } else { num / den };
    TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    }
}

/// Hue on the green (120) → yellow (60) → red (0) gradient.
/// Identical min and max map everything to green.
pub fn price_hue(price: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 120.0;
    }
    let ratio = (price - min) / (max - min);
    120.0 - ratio * 120.0
}

/// HSL (hue in degrees, saturation and lightness in 0..=1) to RGB
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

/// Gradient colour for a price, at the 70% saturation / 50% lightness of the legend
pub fn price_color(price: f64, min: f64, max: f64) -> (u8, u8, u8) {
    hsl_to_rgb(price_hue(price, min, max), 0.7, 0.5)
}

/// Insert `,` between thousands of an integer
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Whole-dollar USD, e.g. `$452,600`. Non-finite input renders as `$0`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let rounded = value.round() as i64;
    if rounded < 0 {
        format!("-${}", group_thousands(-rounded))
    } else {
        format!("${}", group_thousands(rounded))
    }
}

/// Integers get thousands separators, everything else two decimals
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        group_thousands(value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Compact axis label: `150K`, `1.5M`
pub fn format_compact(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format_number(value)
    }
}

/// Cosmetic feature label: underscores become spaces and the one-hot
/// `ocean proximity ` prefix is dropped
pub fn display_feature_name(name: &str) -> String {
    name.replace('_', " ").replacen("ocean proximity ", "", 1)
}

/// Column header label: underscores become spaces, upper-cased
pub fn display_column_name(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

/// Min and max of a sequence, ignoring non-finite values
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_perfect_positive() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        assert!((calc_correlation(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_perfect_negative() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![8.0, 6.0, 4.0, 2.0];
        assert!((calc_correlation(&x, &y) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_undefined_is_zero() {
        assert_eq!(calc_correlation(&[], &[]), 0.0);
        assert_eq!(calc_correlation(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(calc_correlation(&[4.0, 4.0], &[1.0, 9.0]), 0.0);
    }

    #[test]
    fn test_correlation_stays_in_range() {
        let x = vec![0.3, 1.7, 2.2, 9.1, 4.4, 5.0, 0.1];
        let y = vec![3.0, -1.0, 2.5, 7.7, 0.0, 4.2, 1.1];
        let r = calc_correlation(&x, &y);
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_trend_line() {
        let line = calc_trend_line(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((line.slope - 2.0).abs() < 1e-12);
        assert!(line.intercept.abs() < 1e-12);
        assert!((line.at(10.0) - 20.0).abs() < 1e-9);

        assert_eq!(calc_trend_line(&[1.0], &[5.0]), TrendLine::default());
        assert_eq!(calc_trend_line(&[2.0, 2.0], &[1.0, 3.0]).slope, 0.0);
    }

    #[test]
    fn test_price_hue_endpoints() {
        for (min, max) in [(100.0, 200.0), (15_000.0, 500_001.0), (0.5, 0.75)] {
            assert_eq!(price_hue(min, min, max), 120.0);
            assert_eq!(price_hue(max, min, max), 0.0);
            assert_eq!(price_hue((min + max) / 2.0, min, max), 60.0);
        }
        assert_eq!(price_hue(42.0, 42.0, 42.0), 120.0);
    }

    #[test]
    fn test_hsl_to_rgb() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(60.0, 1.0, 0.5), (255, 255, 0));
        assert_eq!(price_color(1.0, 1.0, 2.0), (38, 217, 38));
    }

    #[test]
    fn test_currency_and_number_formatting() {
        assert_eq!(format_currency(452600.4), "$452,600");
        assert_eq!(format_currency(999.5), "$1,000");
        assert_eq!(format_currency(-1234.0), "-$1,234");
        assert_eq!(format_currency(f64::NAN), "$0");
        assert_eq!(format_number(1200.0), "1,200");
        assert_eq!(format_number(8.3252), "8.33");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(999), "999");
    }

    #[test]
    fn test_compact_and_labels() {
        assert_eq!(format_compact(150_000.0), "150K");
        assert_eq!(format_compact(1_500_000.0), "1.5M");
        assert_eq!(format_compact(12.0), "12");
        assert_eq!(display_feature_name("ocean_proximity_NEAR_BAY"), "NEAR BAY");
        assert_eq!(display_feature_name("median_income"), "median income");
        assert_eq!(display_column_name("housing_median_age"), "HOUSING MEDIAN AGE");
    }
}
