//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every multi-step engine operation lives in exactly one
//! repository method with exactly one database transaction.

pub mod account;
pub mod credit_note;
pub mod invoice;
pub mod journal;
pub mod payment;
pub mod sequence;

pub use account::{AccountError, AccountRepository, CreateAccountInput, system_accounts};
pub use credit_note::{CreditNoteError, CreditNoteRepository, CreditNoteResult};
pub use invoice::{
    FinalizeInput, InvoiceRepoError, InvoiceRepository, InvoiceWithLines,
};
pub use journal::{EntryWithLines, JournalError, JournalRepository, PostEntryInput};
pub use payment::{PaymentRepoError, PaymentRepository, RecordPaymentInput, RecordedPayment};
pub use sequence::{SequenceError, SequenceRepository};
