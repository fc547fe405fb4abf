//! Document number formats and period keys.
//!
//! Human-readable document numbers follow `<PREFIX>-<period>-<NNNNN>` with
//! the sequence zero-padded to 5 digits, e.g. `INV-2025-00042` or
//! `GD-2025-10-00001`. Sequences are scoped per company, document type, and
//! period; allocation itself lives in the database layer so it can be made
//! race-free with an atomic counter row.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Width of the zero-padded sequence component.
pub const SEQUENCE_WIDTH: usize = 5;

/// The kinds of documents the numbering service issues identifiers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Tax invoice.
    Invoice,
    /// Credit note reversing a finalized invoice.
    CreditNote,
    /// Payment received against an invoice.
    Payment,
    /// Receipt issued to a customer.
    Receipt,
    /// Goods dispatch (shipment) document.
    Dispatch,
    /// Journal entry.
    Journal,
}

/// Period granularity for a document type's sequence scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodGranularity {
    /// Sequence resets every calendar year.
    Year,
    /// Sequence resets every calendar month.
    YearMonth,
}

impl DocumentType {
    /// Returns the document number prefix.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Invoice => "INV",
            Self::CreditNote => "CRN",
            Self::Payment => "PMT",
            Self::Receipt => "RCP",
            Self::Dispatch => "GD",
            Self::Journal => "JE",
        }
    }

    /// Returns the period granularity for this document type.
    ///
    /// Dispatch documents are numbered per month; everything else per year.
    #[must_use]
    pub const fn granularity(&self) -> PeriodGranularity {
        match self {
            Self::Dispatch => PeriodGranularity::YearMonth,
            _ => PeriodGranularity::Year,
        }
    }

    /// Returns the period key for a document dated `date`.
    #[must_use]
    pub fn period_key(&self, date: NaiveDate) -> String {
        match self.granularity() {
            PeriodGranularity::Year => format!("{}", date.year()),
            PeriodGranularity::YearMonth => format!("{}-{:02}", date.year(), date.month()),
        }
    }

    /// Database identifier for this document type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::CreditNote => "credit_note",
            Self::Payment => "payment",
            Self::Receipt => "receipt",
            Self::Dispatch => "dispatch",
            Self::Journal => "journal",
        }
    }
}

/// Formats a full document number from its parts.
#[must_use]
pub fn format_number(doc_type: DocumentType, period_key: &str, sequence: i64) -> String {
    format!(
        "{}-{}-{:0width$}",
        doc_type.prefix(),
        period_key,
        sequence,
        width = SEQUENCE_WIDTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(DocumentType::Invoice, "INV")]
    #[case(DocumentType::CreditNote, "CRN")]
    #[case(DocumentType::Payment, "PMT")]
    #[case(DocumentType::Receipt, "RCP")]
    #[case(DocumentType::Dispatch, "GD")]
    #[case(DocumentType::Journal, "JE")]
    fn test_prefixes(#[case] doc_type: DocumentType, #[case] prefix: &str) {
        assert_eq!(doc_type.prefix(), prefix);
    }

    #[test]
    fn test_yearly_period_key() {
        assert_eq!(DocumentType::Invoice.period_key(date(2025, 10, 7)), "2025");
        assert_eq!(DocumentType::Journal.period_key(date(2026, 1, 1)), "2026");
    }

    #[test]
    fn test_monthly_period_key() {
        assert_eq!(
            DocumentType::Dispatch.period_key(date(2025, 10, 7)),
            "2025-10"
        );
        assert_eq!(
            DocumentType::Dispatch.period_key(date(2025, 3, 31)),
            "2025-03"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(
            format_number(DocumentType::Invoice, "2025", 1),
            "INV-2025-00001"
        );
        assert_eq!(
            format_number(DocumentType::Dispatch, "2025-10", 7),
            "GD-2025-10-00007"
        );
        assert_eq!(
            format_number(DocumentType::Journal, "2025", 99999),
            "JE-2025-99999"
        );
    }

    #[test]
    fn test_format_number_wide_sequence() {
        // Sequences past the pad width keep all digits rather than truncating.
        assert_eq!(
            format_number(DocumentType::Payment, "2025", 123_456),
            "PMT-2025-123456"
        );
    }

    #[test]
    fn test_as_str_round_trip_identifiers() {
        assert_eq!(DocumentType::Invoice.as_str(), "invoice");
        assert_eq!(DocumentType::CreditNote.as_str(), "credit_note");
        assert_eq!(DocumentType::Dispatch.as_str(), "dispatch");
    }
}
