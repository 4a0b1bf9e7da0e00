//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored and displayed as `f64`; every sum goes through
//! `Decimal` and is rounded back to 2 decimal places.

use rust_decimal::prelude::*;

use super::types::OrderLine;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Inputs are validated as finite at the boundary (`Order::add_item`).
/// If NaN/Infinity reaches here anyway it is logged and treated as zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(
            value = ?value,
            "Non-finite f64 in monetary calculation, defaulting to zero"
        );
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_else(|| {
            tracing::error!(value = %value, "Decimal out of f64 range, defaulting to zero");
            0.0
        })
}

/// `a + b`, clamped to the `Decimal` range
///
/// Stored orders are not re-validated on load, so sums over them may
/// exceed the range; they saturate instead of overflowing.
pub fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        tracing::error!(a = %a, b = %b, "Monetary sum out of range, saturating");
        if b.is_sign_negative() { Decimal::MIN } else { Decimal::MAX }
    })
}

/// unit_price × quantity, clamped to the `Decimal` range
#[inline]
pub fn line_total(line: &OrderLine) -> Decimal {
    let price = to_decimal(line.unit_price);
    price
        .checked_mul(Decimal::from(line.quantity))
        .unwrap_or_else(|| {
            tracing::error!(
                plate_id = %line.plate_id,
                unit_price = line.unit_price,
                quantity = line.quantity,
                "Line total out of range, saturating"
            );
            if price.is_sign_negative() == (line.quantity < 0) {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
}

/// Σ(unit_price × quantity)
pub fn lines_total(lines: &[OrderLine]) -> Decimal {
    lines.iter().map(line_total).fold(Decimal::ZERO, add)
}

/// Average of `sum` over `count` items; zero when there are none
pub fn average(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum / Decimal::from(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: f64, quantity: i32) -> OrderLine {
        OrderLine {
            plate_id: "p".to_string(),
            name: "Plate".to_string(),
            unit_price: price,
            quantity,
        }
    }

    #[test]
    fn test_to_decimal_precision() {
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_lines_total() {
        let lines = vec![line(10.99, 3), line(0.01, 1000)];
        assert_eq!(to_f64(lines_total(&lines)), 42.97);
    }

    #[test]
    fn test_average_rounds_half_away_from_zero() {
        let avg = average(Decimal::from(35000), 3);
        assert_eq!(to_f64(avg), 11666.67);
        assert_eq!(average(Decimal::from(100), 0), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_totals_saturate() {
        let huge = line(1.0e28, 9);
        assert_eq!(line_total(&huge), Decimal::MAX);
        assert_eq!(lines_total(&[huge.clone(), huge]), Decimal::MAX);
        assert_eq!(add(Decimal::MAX, Decimal::ONE), Decimal::MAX);
    }
}
