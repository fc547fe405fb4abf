//! Credit-note mirroring: negated quantities with re-derived tax.
//!
//! A credit note is an invoice-shaped document whose every line quantity is
//! negated. Tax is re-applied through the calculator rather than copied,
//! so a rate change between invoice and credit note dates is reflected
//! instead of silently reproduced.

use rust_decimal::Decimal;

use khata_shared::types::round_money;

use crate::gst::compute_line_tax;

use super::error::InvoiceError;
use super::types::{InvoiceLineDraft, InvoiceTotals};

/// The stored line data of the invoice being credited.
#[derive(Debug, Clone)]
pub struct CreditNoteLineSource {
    /// Product or service name.
    pub product_name: String,
    /// HSN/SAC code.
    pub hsn_code: Option<String>,
    /// Original (positive) quantity.
    pub quantity: Decimal,
    /// Original unit rate.
    pub unit_rate: Decimal,
    /// Original line discount.
    pub discount: Decimal,
    /// Per-unit cost price, when recorded.
    pub cost_price: Option<Decimal>,
}

/// Builds the mirrored credit-note lines for a finalized invoice.
///
/// Quantities and discounts are negated, making every taxable amount and
/// tax component the exact negation of a freshly computed line. The rate
/// lookup runs again per line.
///
/// # Errors
///
/// Returns `InvoiceError` if tax re-derivation fails (missing state,
/// unknown rate).
pub fn mirror_lines<R>(
    original: &[CreditNoteLineSource],
    customer_state: &str,
    company_state: &str,
    rate_lookup: R,
) -> Result<(Vec<InvoiceLineDraft>, InvoiceTotals), InvoiceError>
where
    R: Fn(Option<&str>) -> Option<Decimal>,
{
    if original.is_empty() {
        return Err(InvoiceError::NoLineItems);
    }

    let mut lines = Vec::with_capacity(original.len());

    for (idx, source) in original.iter().enumerate() {
        let quantity = -source.quantity;
        let discount = -source.discount;
        let gross = round_money(quantity * source.unit_rate);
        let taxable = gross - discount;

        let total_rate = rate_lookup(source.hsn_code.as_deref()).ok_or_else(|| {
            crate::gst::GstError::RateNotFound {
                hsn: source.hsn_code.clone().unwrap_or_default(),
            }
        })?;

        let tax = compute_line_tax(taxable, customer_state, company_state, total_rate)?;
        let line_total = taxable + tax.total_tax();

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        lines.push(InvoiceLineDraft {
            line_no: (idx + 1) as i32,
            product_name: source.product_name.clone(),
            hsn_code: source.hsn_code.clone(),
            quantity,
            unit_rate: source.unit_rate,
            discount,
            taxable,
            tax,
            line_total,
            cost_price: source.cost_price,
        });
    }

    let totals = InvoiceTotals::from_lines(&lines);
    Ok((lines, totals))
}

/// Narration for the reversing journal entry.
#[must_use]
pub fn reversal_narration(original_number: &str, reason: &str) -> String {
    format!("Credit note against {original_number}. Reason: {reason}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn source(qty: Decimal, rate: Decimal, discount: Decimal) -> CreditNoteLineSource {
        CreditNoteLineSource {
            product_name: "Widget".to_string(),
            hsn_code: Some("8473".to_string()),
            quantity: qty,
            unit_rate: rate,
            discount,
            cost_price: Some(dec!(60)),
        }
    }

    fn standard_rate(_hsn: Option<&str>) -> Option<Decimal> {
        Some(dec!(18))
    }

    #[test]
    fn test_mirror_negates_amounts() {
        let (lines, totals) = mirror_lines(
            &[source(dec!(10), dec!(100), dec!(0))],
            "Maharashtra",
            "Maharashtra",
            standard_rate,
        )
        .unwrap();

        assert_eq!(lines[0].quantity, dec!(-10));
        assert_eq!(lines[0].taxable, dec!(-1000.00));
        assert_eq!(lines[0].tax.cgst_amount, dec!(-90.00));
        assert_eq!(lines[0].tax.sgst_amount, dec!(-90.00));
        assert_eq!(lines[0].line_total, dec!(-1180.00));
        assert_eq!(totals.total, dec!(-1180.00));
    }

    #[test]
    fn test_mirror_with_discount() {
        let (lines, _) = mirror_lines(
            &[source(dec!(10), dec!(100), dec!(50))],
            "Goa",
            "Goa",
            standard_rate,
        )
        .unwrap();

        // Original taxable was 950; mirror is -950.
        assert_eq!(lines[0].discount, dec!(-50));
        assert_eq!(lines[0].taxable, dec!(-950.00));
        assert_eq!(lines[0].tax.cgst_amount, dec!(-85.50));
    }

    #[test]
    fn test_mirror_sums_to_zero_with_original() {
        use crate::invoice::builder::{InvoiceBuilder, ShipmentItem};

        let items = vec![ShipmentItem {
            product_name: "Widget".into(),
            hsn_code: Some("8473".into()),
            quantity: dec!(3),
            selling_price: Some(dec!(333.33)),
            cost_price: None,
            discount: dec!(0),
        }];
        let (original, orig_totals) =
            InvoiceBuilder::build_lines(&items, "Kerala", "Goa", standard_rate).unwrap();

        let sources: Vec<CreditNoteLineSource> = original
            .iter()
            .map(|l| CreditNoteLineSource {
                product_name: l.product_name.clone(),
                hsn_code: l.hsn_code.clone(),
                quantity: l.quantity,
                unit_rate: l.unit_rate,
                discount: l.discount,
                cost_price: l.cost_price,
            })
            .collect();

        let (_, mirror_totals) = mirror_lines(&sources, "Kerala", "Goa", standard_rate).unwrap();

        assert_eq!(orig_totals.total + mirror_totals.total, dec!(0));
        assert_eq!(orig_totals.igst + mirror_totals.igst, dec!(0));
        assert_eq!(
            orig_totals.taxable_value() + mirror_totals.taxable_value(),
            dec!(0)
        );
    }

    #[test]
    fn test_mirror_empty_fails() {
        let err = mirror_lines(&[], "Goa", "Goa", standard_rate).unwrap_err();
        assert_eq!(err, InvoiceError::NoLineItems);
    }

    #[test]
    fn test_reversal_narration() {
        let narration = reversal_narration("INV-2025-00042", "Goods returned");
        assert!(narration.contains("INV-2025-00042"));
        assert!(narration.contains("Goods returned"));
    }
}
