//! `SeaORM` entity definitions for the billing schema.

pub mod companies;
pub mod customers;
pub mod document_sequences;
pub mod invoice_lines;
pub mod invoices;
pub mod journal_entries;
pub mod journal_lines;
pub mod ledger_accounts;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod shipment_items;
pub mod shipments;
pub mod tax_rates;
