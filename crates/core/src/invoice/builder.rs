//! Invoice builder: shipment items to computed invoice lines.
//!
//! This is pure business logic with no database dependencies. Rate lookup
//! is injected as a closure so the database layer can back it with the
//! per-company `tax_rates` table.

use rust_decimal::Decimal;

use khata_shared::types::round_money;

use crate::gst::compute_line_tax;

use super::error::InvoiceError;
use super::types::{InvoiceLineDraft, InvoiceTotals};

/// A line item read from the source shipment.
#[derive(Debug, Clone)]
pub struct ShipmentItem {
    /// Product or service name.
    pub product_name: String,
    /// HSN/SAC tax-classification code, if recorded.
    pub hsn_code: Option<String>,
    /// Quantity dispatched (fractional allowed).
    pub quantity: Decimal,
    /// Selling price per unit, if set.
    pub selling_price: Option<Decimal>,
    /// Cost price per unit, if set.
    pub cost_price: Option<Decimal>,
    /// Flat discount on the line.
    pub discount: Decimal,
}

impl ShipmentItem {
    /// Resolves the unit rate: selling price, falling back to cost price.
    fn unit_rate(&self) -> Result<Decimal, InvoiceError> {
        self.selling_price
            .or(self.cost_price)
            .ok_or_else(|| InvoiceError::MissingUnitPrice {
                product: self.product_name.clone(),
            })
    }
}

/// Stateless invoice construction service.
///
/// Contains pure computation only; persistence and numbering happen in the
/// database layer after these lines validate.
pub struct InvoiceBuilder;

impl InvoiceBuilder {
    /// Builds computed invoice lines from shipment items.
    ///
    /// For each item this resolves the unit price, computes the taxable
    /// amount (`quantity x rate - discount`), applies per-line GST via the
    /// injected `rate_lookup` (HSN/SAC -> total rate percent), and returns
    /// the lines together with the aggregated totals.
    ///
    /// The GST split (CGST+SGST vs IGST) is derived once from the state
    /// pair and applied uniformly: `compute_line_tax` receives the same
    /// states for every line, so a mixed split cannot occur.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` if the shipment is empty, a line has zero
    /// quantity or no resolvable price, a discount exceeds the line amount,
    /// or GST computation fails (missing state, unknown rate).
    pub fn build_lines<R>(
        items: &[ShipmentItem],
        customer_state: &str,
        company_state: &str,
        rate_lookup: R,
    ) -> Result<(Vec<InvoiceLineDraft>, InvoiceTotals), InvoiceError>
    where
        R: Fn(Option<&str>) -> Option<Decimal>,
    {
        if items.is_empty() {
            return Err(InvoiceError::NoLineItems);
        }

        let mut lines = Vec::with_capacity(items.len());

        for (idx, item) in items.iter().enumerate() {
            if item.quantity.is_zero() {
                return Err(InvoiceError::ZeroQuantity {
                    product: item.product_name.clone(),
                });
            }

            let unit_rate = item.unit_rate()?;
            let gross = round_money(item.quantity * unit_rate);
            if item.discount > gross {
                return Err(InvoiceError::DiscountExceedsAmount {
                    product: item.product_name.clone(),
                    discount: item.discount.to_string(),
                    gross: gross.to_string(),
                });
            }
            let taxable = gross - item.discount;

            let total_rate = rate_lookup(item.hsn_code.as_deref()).ok_or_else(|| {
                crate::gst::GstError::RateNotFound {
                    hsn: item.hsn_code.clone().unwrap_or_default(),
                }
            })?;

            let tax = compute_line_tax(taxable, customer_state, company_state, total_rate)?;
            let line_total = taxable + tax.total_tax();

            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            lines.push(InvoiceLineDraft {
                line_no: (idx + 1) as i32,
                product_name: item.product_name.clone(),
                hsn_code: item.hsn_code.clone(),
                quantity: item.quantity,
                unit_rate,
                discount: item.discount,
                taxable,
                tax,
                line_total,
                cost_price: item.cost_price,
            });
        }

        let totals = InvoiceTotals::from_lines(&lines);
        Ok((lines, totals))
    }

    /// Total cost of goods across lines, if every line carries a cost price.
    ///
    /// Returns `None` when any line lacks a cost price; the caller then
    /// skips the COGS posting rather than booking a fabricated zero.
    #[must_use]
    pub fn cost_total(lines: &[InvoiceLineDraft]) -> Option<Decimal> {
        let mut total = Decimal::ZERO;
        for line in lines {
            let cost = line.cost_price?;
            total += round_money(line.quantity * cost);
        }
        Some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::gst::GstError;

    fn item(name: &str, qty: Decimal, selling: Option<Decimal>, cost: Option<Decimal>) -> ShipmentItem {
        ShipmentItem {
            product_name: name.to_string(),
            hsn_code: Some("8473".to_string()),
            quantity: qty,
            selling_price: selling,
            cost_price: cost,
            discount: Decimal::ZERO,
        }
    }

    fn standard_rate(_hsn: Option<&str>) -> Option<Decimal> {
        Some(dec!(18))
    }

    #[test]
    fn test_build_single_line_intra_state() {
        let items = vec![item("Widget", dec!(10), Some(dec!(100)), Some(dec!(60)))];
        let (lines, totals) =
            InvoiceBuilder::build_lines(&items, "Maharashtra", "Maharashtra", standard_rate)
                .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_no, 1);
        assert_eq!(lines[0].taxable, dec!(1000.00));
        assert_eq!(lines[0].tax.cgst_amount, dec!(90.00));
        assert_eq!(lines[0].tax.sgst_amount, dec!(90.00));
        assert_eq!(lines[0].line_total, dec!(1180.00));
        assert_eq!(totals.total, dec!(1180.00));
    }

    #[test]
    fn test_build_inter_state() {
        let items = vec![item("Widget", dec!(10), Some(dec!(100)), None)];
        let (lines, totals) =
            InvoiceBuilder::build_lines(&items, "Karnataka", "Maharashtra", standard_rate).unwrap();

        assert_eq!(lines[0].tax.igst_amount, dec!(180.00));
        assert_eq!(lines[0].tax.cgst_amount, dec!(0));
        assert_eq!(totals.igst, dec!(180.00));
        assert_eq!(totals.cgst, dec!(0));
    }

    #[test]
    fn test_selling_price_fallback_to_cost() {
        let items = vec![item("Loose stock", dec!(5), None, Some(dec!(40)))];
        let (lines, _) =
            InvoiceBuilder::build_lines(&items, "Goa", "Goa", standard_rate).unwrap();
        assert_eq!(lines[0].unit_rate, dec!(40));
        assert_eq!(lines[0].taxable, dec!(200.00));
    }

    #[test]
    fn test_missing_price_fails() {
        let items = vec![item("No price", dec!(5), None, None)];
        let err = InvoiceBuilder::build_lines(&items, "Goa", "Goa", standard_rate).unwrap_err();
        assert!(matches!(err, InvoiceError::MissingUnitPrice { .. }));
    }

    #[test]
    fn test_empty_shipment_fails() {
        let err =
            InvoiceBuilder::build_lines(&[], "Goa", "Goa", standard_rate).unwrap_err();
        assert_eq!(err, InvoiceError::NoLineItems);
    }

    #[test]
    fn test_zero_quantity_fails() {
        let items = vec![item("Ghost", dec!(0), Some(dec!(10)), None)];
        let err = InvoiceBuilder::build_lines(&items, "Goa", "Goa", standard_rate).unwrap_err();
        assert!(matches!(err, InvoiceError::ZeroQuantity { .. }));
    }

    #[test]
    fn test_rate_not_found_fails() {
        let items = vec![item("Widget", dec!(1), Some(dec!(10)), None)];
        let err = InvoiceBuilder::build_lines(&items, "Goa", "Goa", |_| None).unwrap_err();
        assert!(matches!(err, InvoiceError::Gst(GstError::RateNotFound { .. })));
    }

    #[test]
    fn test_missing_state_fails_line() {
        let items = vec![item("Widget", dec!(1), Some(dec!(10)), None)];
        let err = InvoiceBuilder::build_lines(&items, "", "Goa", standard_rate).unwrap_err();
        assert_eq!(
            err,
            InvoiceError::Gst(GstError::MissingState { side: "customer" })
        );
    }

    #[test]
    fn test_discount_applied_before_tax() {
        let mut it = item("Widget", dec!(10), Some(dec!(100)), None);
        it.discount = dec!(50);
        let (lines, totals) =
            InvoiceBuilder::build_lines(&[it], "Goa", "Goa", standard_rate).unwrap();

        assert_eq!(lines[0].taxable, dec!(950.00));
        // 950 @ 9% = 85.50 each side
        assert_eq!(lines[0].tax.cgst_amount, dec!(85.50));
        assert_eq!(totals.subtotal, dec!(1000.00));
        assert_eq!(totals.discount, dec!(50));
        assert_eq!(totals.total, dec!(1121.00));
    }

    #[test]
    fn test_discount_exceeding_gross_fails() {
        let mut it = item("Widget", dec!(1), Some(dec!(10)), None);
        it.discount = dec!(11);
        let err = InvoiceBuilder::build_lines(&[it], "Goa", "Goa", standard_rate).unwrap_err();
        assert!(matches!(err, InvoiceError::DiscountExceedsAmount { .. }));
    }

    #[test]
    fn test_fractional_quantity() {
        let items = vec![item("Fabric", dec!(2.5), Some(dec!(99.99)), None)];
        let (lines, _) =
            InvoiceBuilder::build_lines(&items, "Goa", "Goa", standard_rate).unwrap();
        // 2.5 x 99.99 = 249.975 -> 249.98 half-up
        assert_eq!(lines[0].taxable, dec!(249.98));
    }

    #[test]
    fn test_multi_line_totals() {
        let items = vec![
            item("A", dec!(2), Some(dec!(250)), Some(dec!(150))),
            item("B", dec!(1), Some(dec!(500)), Some(dec!(300))),
        ];
        let (lines, totals) =
            InvoiceBuilder::build_lines(&items, "Goa", "Goa", standard_rate).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line_no, 2);
        assert_eq!(totals.subtotal, dec!(1000.00));
        assert_eq!(totals.cgst + totals.sgst, dec!(180.00));
        assert_eq!(totals.total, dec!(1180.00));
    }

    #[test]
    fn test_cost_total() {
        let items = vec![
            item("A", dec!(2), Some(dec!(250)), Some(dec!(150))),
            item("B", dec!(1), Some(dec!(500)), Some(dec!(300))),
        ];
        let (lines, _) =
            InvoiceBuilder::build_lines(&items, "Goa", "Goa", standard_rate).unwrap();
        assert_eq!(InvoiceBuilder::cost_total(&lines), Some(dec!(600.00)));
    }

    #[test]
    fn test_cost_total_missing_cost() {
        let items = vec![
            item("A", dec!(2), Some(dec!(250)), Some(dec!(150))),
            item("B", dec!(1), Some(dec!(500)), None),
        ];
        let (lines, _) =
            InvoiceBuilder::build_lines(&items, "Goa", "Goa", standard_rate).unwrap();
        assert_eq!(InvoiceBuilder::cost_total(&lines), None);
    }

    #[test]
    fn test_fractional_midpoint_lines_keep_header_and_lines_consistent() {
        use uuid::Uuid;

        use crate::ledger::{SalesAccounts, invoice_lines, validate_lines};

        // Four lines whose raw gross (0.5 x 99.99 = 49.995) sits on the
        // half-paisa midpoint; each rounds up to 50.00. The header subtotal
        // must follow the rounded line values, not quantity x rate.
        let items: Vec<ShipmentItem> = (0..4)
            .map(|i| item(&format!("Part {i}"), dec!(0.5), Some(dec!(99.99)), None))
            .collect();
        let (lines, totals) =
            InvoiceBuilder::build_lines(&items, "Maharashtra", "Maharashtra", standard_rate)
                .unwrap();

        let line_taxable: Decimal = lines.iter().map(|l| l.taxable).sum();
        assert_eq!(line_taxable, dec!(200.00));
        assert_eq!(totals.subtotal, dec!(200.00));
        assert_eq!(totals.taxable_value(), line_taxable);
        assert_eq!(
            totals.total,
            totals.taxable_value() + totals.cgst + totals.sgst + totals.igst
        );
        assert_eq!(totals.total, dec!(236.00));

        // The resulting sales posting balances.
        let accounts = SalesAccounts {
            receivable: Uuid::new_v4(),
            sales: Uuid::new_v4(),
            cgst_payable: Uuid::new_v4(),
            sgst_payable: Uuid::new_v4(),
            igst_payable: Uuid::new_v4(),
        };
        let posting = invoice_lines(&accounts, &totals, "INV-2026-00001");
        assert!(validate_lines(&posting).is_ok());
    }
}
