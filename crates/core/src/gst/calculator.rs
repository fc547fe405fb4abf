//! Pure GST line-tax calculator.
//!
//! The split between CGST+SGST and IGST is decided once per invoice from the
//! customer-state vs company-state comparison and then applied to every
//! line. Amounts are rounded half-up to the paisa; GST compliance depends on
//! that rounding policy, so it is centralized in `khata_shared::types::money`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use khata_shared::types::round_money;

use super::error::GstError;

/// Whether a supply crosses state lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Customer and company are in the same state: CGST + SGST apply.
    IntraState,
    /// Customer and company are in different states: IGST applies.
    InterState,
}

/// Per-line GST breakdown.
///
/// Exactly one of the CGST+SGST pair or IGST is nonzero; the split is never
/// mixed within one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakup {
    /// CGST rate percent (half the total rate for intra-state, else zero).
    pub cgst_rate: Decimal,
    /// CGST amount, rounded to the paisa.
    pub cgst_amount: Decimal,
    /// SGST rate percent (half the total rate for intra-state, else zero).
    pub sgst_rate: Decimal,
    /// SGST amount, rounded to the paisa.
    pub sgst_amount: Decimal,
    /// IGST rate percent (the full rate for inter-state, else zero).
    pub igst_rate: Decimal,
    /// IGST amount, rounded to the paisa.
    pub igst_amount: Decimal,
}

impl TaxBreakup {
    /// Returns a zero breakup (0% rate).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            cgst_rate: Decimal::ZERO,
            cgst_amount: Decimal::ZERO,
            sgst_rate: Decimal::ZERO,
            sgst_amount: Decimal::ZERO,
            igst_rate: Decimal::ZERO,
            igst_amount: Decimal::ZERO,
        }
    }

    /// Total tax across all components.
    #[must_use]
    pub fn total_tax(&self) -> Decimal {
        self.cgst_amount + self.sgst_amount + self.igst_amount
    }
}

/// Normalizes a state name for comparison: trimmed and case-folded.
fn normalize_state(state: &str) -> String {
    state.trim().to_lowercase()
}

/// Determines the supply type from the two place-of-supply states.
///
/// # Errors
///
/// Returns `GstError::MissingState` if either state is blank; the engine
/// never assumes a state.
pub fn supply_type(customer_state: &str, company_state: &str) -> Result<SupplyType, GstError> {
    let customer = normalize_state(customer_state);
    if customer.is_empty() {
        return Err(GstError::MissingState { side: "customer" });
    }
    let company = normalize_state(company_state);
    if company.is_empty() {
        return Err(GstError::MissingState { side: "company" });
    }

    if customer == company {
        Ok(SupplyType::IntraState)
    } else {
        Ok(SupplyType::InterState)
    }
}

/// Computes the GST breakdown for one invoice line.
///
/// Intra-state supplies split `total_rate` evenly into CGST and SGST;
/// inter-state supplies apply the full rate as IGST. Amounts are
/// `taxable x rate / 100` rounded half-up to 2 decimal places.
///
/// # Errors
///
/// Returns `GstError::MissingState` for a blank state on either side, or
/// `GstError::NegativeRate` for a negative rate.
pub fn compute_line_tax(
    taxable: Decimal,
    customer_state: &str,
    company_state: &str,
    total_rate: Decimal,
) -> Result<TaxBreakup, GstError> {
    if total_rate < Decimal::ZERO {
        return Err(GstError::NegativeRate(total_rate.to_string()));
    }

    let supply = supply_type(customer_state, company_state)?;
    let hundred = Decimal::ONE_HUNDRED;

    match supply {
        SupplyType::IntraState => {
            let half_rate = total_rate / Decimal::TWO;
            let half_amount = round_money(taxable * half_rate / hundred);
            Ok(TaxBreakup {
                cgst_rate: half_rate,
                cgst_amount: half_amount,
                sgst_rate: half_rate,
                sgst_amount: half_amount,
                igst_rate: Decimal::ZERO,
                igst_amount: Decimal::ZERO,
            })
        }
        SupplyType::InterState => Ok(TaxBreakup {
            cgst_rate: Decimal::ZERO,
            cgst_amount: Decimal::ZERO,
            sgst_rate: Decimal::ZERO,
            sgst_amount: Decimal::ZERO,
            igst_rate: total_rate,
            igst_amount: round_money(taxable * total_rate / hundred),
        }),
    }
}
