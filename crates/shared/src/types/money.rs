//! Money rounding helpers with GST-compliant precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary values are `rust_decimal::Decimal` at scale 2.
//!
//! GST law requires tax amounts rounded to the nearest paisa with halves
//! rounded up (away from zero), so every rounding step in the engine goes
//! through [`round_money`]. Banker's rounding would under-collect tax on
//! exact midpoints and is not acceptable here.

use rust_decimal::{Decimal, RoundingStrategy};

/// One paisa: the tolerance for journal entry balance checks.
pub const PAISA: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds a monetary amount to 2 decimal places, half-up.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if two amounts agree to within one paisa.
#[must_use]
pub fn within_paisa(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= PAISA
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_up() {
        // The .005 midpoint rounds up, not to even.
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.015)), dec!(1.02));
        assert_eq!(round_money(dec!(1.025)), dec!(1.03));
    }

    #[test]
    fn test_round_money_below_midpoint() {
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(99.994)), dec!(99.99));
    }

    #[test]
    fn test_round_money_negative_away_from_zero() {
        // Credit note amounts are negative; the midpoint moves away from zero.
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_money(dec!(-1.004)), dec!(-1.00));
    }

    #[test]
    fn test_round_money_already_scaled() {
        assert_eq!(round_money(dec!(180.00)), dec!(180.00));
        assert_eq!(round_money(dec!(0)), dec!(0));
    }

    #[test]
    fn test_paisa_constant() {
        assert_eq!(PAISA, dec!(0.01));
    }

    #[test]
    fn test_within_paisa() {
        assert!(within_paisa(dec!(100.00), dec!(100.00)));
        assert!(within_paisa(dec!(100.00), dec!(100.01)));
        assert!(within_paisa(dec!(100.01), dec!(100.00)));
        assert!(!within_paisa(dec!(100.00), dec!(100.02)));
        assert!(!within_paisa(dec!(100.00), dec!(99.98)));
    }
}
