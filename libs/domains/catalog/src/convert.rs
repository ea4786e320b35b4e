//! Price rounding and currency conversion helpers.

/// Round a price to two decimal places.
///
/// Goes through the decimal string representation so that results match
/// what clients see in serialized responses.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Convert a EUR price to USD using the given exchange rate, rounded to
/// two decimal places.
pub fn eur_to_usd(price_eur: f64, usd_rate: f64) -> f64 {
    round2(price_eur * usd_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_truncates_long_fractions() {
        assert_eq!(round2(10.556), 10.56);
        assert_eq!(round2(10.554), 10.55);
    }

    #[test]
    fn test_round2_keeps_short_values() {
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(19.99), 19.99);
    }

    #[test]
    fn test_eur_to_usd_applies_rate() {
        assert_eq!(eur_to_usd(100.0, 1.0545), 105.45);
        assert_eq!(eur_to_usd(9.99, 1.0), 9.99);
    }

    #[test]
    fn test_eur_to_usd_rounds_result() {
        // 33.33 * 1.0545 = 35.146485
        assert_eq!(eur_to_usd(33.33, 1.0545), 35.15);
    }
}
