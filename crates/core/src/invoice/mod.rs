//! Invoice assembly, totals, and lifecycle rules.
//!
//! This module implements the pure half of the invoice builder:
//! - Line construction from shipment items with per-line GST
//! - Totals aggregation and the balance invariants
//! - The draft -> finalized -> credited state machine
//! - Credit-note mirroring (negated quantities, re-derived tax)
//!
//! Persistence, numbering allocation, and transaction boundaries live in
//! the database layer.

pub mod builder;
pub mod credit_note;
pub mod error;
pub mod types;

pub use builder::{InvoiceBuilder, ShipmentItem};
pub use credit_note::{CreditNoteLineSource, mirror_lines, reversal_narration};
pub use error::InvoiceError;
pub use types::{InvoiceKind, InvoiceLineDraft, InvoiceStatus, InvoiceTotals, PaymentStatus};
