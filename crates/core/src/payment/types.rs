//! Payment domain types.

use serde::{Deserialize, Serialize};

/// How a payment was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash (subject to the Section 269ST receipt limit).
    Cash,
    /// Cheque.
    Cheque,
    /// Direct bank transfer.
    BankTransfer,
    /// Unified Payments Interface.
    Upi,
    /// Debit or credit card.
    Card,
    /// NEFT/RTGS transfer.
    NeftRtgs,
    /// IMPS transfer.
    Imps,
    /// Anything else.
    Others,
}

impl PaymentMethod {
    /// Returns true for methods counted against the statutory cash limit.
    #[must_use]
    pub const fn is_cash(self) -> bool {
        matches!(self, Self::Cash)
    }

    /// Database identifier for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Cheque => "cheque",
            Self::BankTransfer => "bank_transfer",
            Self::Upi => "upi",
            Self::Card => "card",
            Self::NeftRtgs => "neft_rtgs",
            Self::Imps => "imps",
            Self::Others => "others",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "cheque" => Ok(Self::Cheque),
            "bank_transfer" => Ok(Self::BankTransfer),
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            "neft_rtgs" => Ok(Self::NeftRtgs),
            "imps" => Ok(Self::Imps),
            "others" => Ok(Self::Others),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}
