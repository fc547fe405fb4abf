//! Property-based tests for the GST calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use khata_shared::types::{PAISA, round_money};

use super::calculator::{SupplyType, compute_line_tax, supply_type};

/// Strategy for taxable amounts (paisa-scaled, up to 1 crore).
fn taxable_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for GST slab rates.
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::new(5, 0)),
        Just(Decimal::new(12, 0)),
        Just(Decimal::new(18, 0)),
        Just(Decimal::new(28, 0)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Intra-state: CGST always equals SGST, IGST is always zero.
    #[test]
    fn prop_intra_state_symmetric(taxable in taxable_strategy(), rate in rate_strategy()) {
        let tax = compute_line_tax(taxable, "Maharashtra", "Maharashtra", rate).unwrap();
        prop_assert_eq!(tax.cgst_amount, tax.sgst_amount);
        prop_assert_eq!(tax.cgst_rate, tax.sgst_rate);
        prop_assert_eq!(tax.igst_amount, Decimal::ZERO);
        prop_assert_eq!(tax.igst_rate, Decimal::ZERO);
    }

    /// Inter-state: only IGST, at the full rate.
    #[test]
    fn prop_inter_state_igst_only(taxable in taxable_strategy(), rate in rate_strategy()) {
        let tax = compute_line_tax(taxable, "Karnataka", "Maharashtra", rate).unwrap();
        prop_assert_eq!(tax.cgst_amount, Decimal::ZERO);
        prop_assert_eq!(tax.sgst_amount, Decimal::ZERO);
        prop_assert_eq!(tax.igst_rate, rate);
    }

    /// Total tax stays within one paisa of the intra-state total, regardless
    /// of split: rounding each half independently can move at most half a
    /// paisa per component.
    #[test]
    fn prop_split_total_close_to_unsplit(taxable in taxable_strategy(), rate in rate_strategy()) {
        let intra = compute_line_tax(taxable, "Goa", "Goa", rate).unwrap();
        let unsplit = round_money(taxable * rate / Decimal::ONE_HUNDRED);
        let diff = (intra.total_tax() - unsplit).abs();
        prop_assert!(diff <= PAISA, "split drift {diff} exceeds one paisa");
    }

    /// Tax amounts are always paisa-scaled (2 decimal places).
    #[test]
    fn prop_amounts_are_scale_two(taxable in taxable_strategy(), rate in rate_strategy()) {
        let tax = compute_line_tax(taxable, "Kerala", "Punjab", rate).unwrap();
        prop_assert!(tax.igst_amount.scale() <= 2);
    }

    /// Supply type is symmetric in its inputs only when states match.
    #[test]
    fn prop_same_state_is_intra(state in "[A-Za-z ]{1,20}") {
        prop_assume!(!state.trim().is_empty());
        let supply = supply_type(&state, &state).unwrap();
        prop_assert_eq!(supply, SupplyType::IntraState);
    }
}
