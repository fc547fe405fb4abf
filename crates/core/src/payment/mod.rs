//! Payment validation and statutory cash limits.

pub mod error;
pub mod types;
pub mod validation;

pub use error::PaymentError;
pub use types::PaymentMethod;
pub use validation::{CASH_RECEIPT_LIMIT, validate_payment};
