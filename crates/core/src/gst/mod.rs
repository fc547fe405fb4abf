//! GST tax calculation.
//!
//! Splits a line's GST into CGST + SGST (intra-state supply) or IGST
//! (inter-state supply) based on the customer's and company's place of
//! supply, and computes the rounded tax amounts.

pub mod calculator;
pub mod error;

#[cfg(test)]
mod calculator_props;

pub use calculator::{SupplyType, TaxBreakup, compute_line_tax, supply_type};
pub use error::GstError;
