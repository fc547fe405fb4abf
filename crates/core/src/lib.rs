//! Core business logic for Khata.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `gst` - GST tax calculation (CGST/SGST vs IGST split)
//! - `numbering` - Document number formats and period keys
//! - `invoice` - Invoice assembly, totals, and lifecycle rules
//! - `ledger` - Double-entry journal validation and posting templates
//! - `payment` - Payment validation and statutory cash limits

pub mod gst;
pub mod invoice;
pub mod ledger;
pub mod numbering;
pub mod payment;
