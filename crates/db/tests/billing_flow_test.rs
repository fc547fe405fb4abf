//! End-to-end billing flow tests against a live Postgres.
//!
//! Each test is a no-op unless `DATABASE_URL` is set, so the suite stays
//! green in environments without a database. Every test provisions its own
//! company, which keeps unique indexes from colliding across runs.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use khata_core::invoice::InvoiceError;
use khata_core::payment::{PaymentError, PaymentMethod};
use khata_db::entities::{companies, customers, shipment_items, shipments};
use khata_db::migration::{Migrator, MigratorTrait};
use khata_db::repositories::{
    AccountRepository, CreditNoteRepository, FinalizeInput, InvoiceRepoError, InvoiceRepository,
    PaymentRepoError, PaymentRepository, RecordPaymentInput, system_accounts,
};

async fn connect() -> Option<DatabaseConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = khata_db::connect(&url).await.expect("connect to database");
    Migrator::up(&db, None).await.expect("run migrations");
    Some(db)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

struct Fixture {
    company_id: Uuid,
    shipment_id: Uuid,
}

/// Creates a company in Maharashtra with a Maharashtra customer, a seeded
/// system chart, and one shipment: 10 x 100.00 (cost 60.00), default 18%.
async fn setup(db: &DatabaseConnection, quantity: Decimal, price: Decimal) -> Fixture {
    let now = Utc::now().into();
    let company_id = Uuid::new_v4();
    companies::ActiveModel {
        id: Set(company_id),
        name: Set("Test Traders".into()),
        gstin: Set(Some("27AAAAA0000A1Z5".into())),
        state: Set("Maharashtra".into()),
        default_gst_rate: Set(dec!(18)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert company");

    let customer_id = Uuid::new_v4();
    customers::ActiveModel {
        id: Set(customer_id),
        company_id: Set(company_id),
        name: Set("Sharma Stores".into()),
        state: Set("Maharashtra".into()),
        gstin: Set(None),
        billing_address: Set(Some("MG Road, Pune".into())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert customer");

    AccountRepository::new(db.clone())
        .seed_system_chart(company_id)
        .await
        .expect("seed chart");

    let shipment_id = Uuid::new_v4();
    shipments::ActiveModel {
        id: Set(shipment_id),
        company_id: Set(company_id),
        customer_id: Set(Some(customer_id)),
        dispatch_number: Set("GD-2026-08-00001".into()),
        dispatch_date: Set(today()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert shipment");

    shipment_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        shipment_id: Set(shipment_id),
        product_name: Set("Widget".into()),
        hsn_code: Set(None),
        quantity: Set(quantity),
        selling_price: Set(Some(price)),
        cost_price: Set(Some(dec!(60))),
        discount: Set(Decimal::ZERO),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert shipment item");

    Fixture {
        company_id,
        shipment_id,
    }
}

async fn balance_of(db: &DatabaseConnection, company_id: Uuid, name: &str) -> Decimal {
    AccountRepository::find_by_name(db, company_id, name)
        .await
        .expect("account exists")
        .current_balance
}

#[tokio::test]
async fn test_draft_finalize_and_full_payment() {
    let Some(db) = connect().await else { return };
    let fx = setup(&db, dec!(10), dec!(100)).await;
    let invoices = InvoiceRepository::new(db.clone());

    let draft = invoices
        .create_draft(fx.company_id, fx.shipment_id, today())
        .await
        .expect("create draft");
    assert!(draft.invoice.number.starts_with("INV-"));
    assert_eq!(draft.invoice.total_amount, dec!(1180.00));
    assert_eq!(draft.invoice.cgst_total, dec!(90.00));
    assert_eq!(draft.invoice.sgst_total, dec!(90.00));
    assert_eq!(draft.invoice.igst_total, dec!(0.00));
    assert_eq!(draft.invoice.balance_due, dec!(1180.00));

    // Nothing posts for a draft.
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::ACCOUNTS_RECEIVABLE).await,
        dec!(0)
    );

    let finalized = invoices
        .finalize(fx.company_id, draft.invoice.id, FinalizeInput::default())
        .await
        .expect("finalize");
    assert!(finalized.invoice.finalized_at.is_some());

    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::ACCOUNTS_RECEIVABLE).await,
        dec!(1180.00)
    );
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::SALES).await,
        dec!(1000.00)
    );
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::CGST_PAYABLE).await,
        dec!(90.00)
    );
    // COGS pairs with inventory relief: 10 x 60.
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::COGS).await,
        dec!(600.00)
    );
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::INVENTORY).await,
        dec!(-600.00)
    );

    let payments = PaymentRepository::new(db.clone());
    let partial = payments
        .record_payment(
            fx.company_id,
            RecordPaymentInput {
                invoice_id: draft.invoice.id,
                amount: dec!(500),
                method: PaymentMethod::Upi,
                payment_date: today(),
                reference: Some("UPI-12345".into()),
            },
        )
        .await
        .expect("partial payment");
    assert_eq!(partial.invoice.balance_due, dec!(680.00));
    assert!(partial.payment.payment_number.starts_with("PMT-"));

    let paid = payments
        .record_payment(
            fx.company_id,
            RecordPaymentInput {
                invoice_id: draft.invoice.id,
                amount: dec!(680),
                method: PaymentMethod::Cash,
                payment_date: today(),
                reference: None,
            },
        )
        .await
        .expect("closing payment");
    assert_eq!(paid.invoice.balance_due, dec!(0.00));
    assert_eq!(paid.invoice.total_paid, dec!(1180.00));

    // UPI lands in Bank, cash in Cash; receivable fully relieved.
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::BANK).await,
        dec!(500.00)
    );
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::CASH).await,
        dec!(680.00)
    );
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::ACCOUNTS_RECEIVABLE).await,
        dec!(0.00)
    );
}

#[tokio::test]
async fn test_credit_note_reverses_posting() {
    let Some(db) = connect().await else { return };
    let fx = setup(&db, dec!(10), dec!(100)).await;
    let invoices = InvoiceRepository::new(db.clone());

    let finalized = invoices
        .create_and_finalize(
            fx.company_id,
            fx.shipment_id,
            today(),
            FinalizeInput::default(),
        )
        .await
        .expect("create and finalize");

    let result = CreditNoteRepository::new(db.clone())
        .create_credit_note(
            fx.company_id,
            finalized.invoice.id,
            today(),
            "Goods returned",
        )
        .await
        .expect("credit note");

    assert!(result.credit_note.invoice.number.starts_with("CRN-"));
    assert_eq!(result.credit_note.invoice.total_amount, dec!(-1180.00));
    assert_eq!(result.credit_note.lines[0].quantity, dec!(-10));

    // Every touched account nets back to zero, COGS included.
    for name in [
        system_accounts::ACCOUNTS_RECEIVABLE,
        system_accounts::SALES,
        system_accounts::CGST_PAYABLE,
        system_accounts::SGST_PAYABLE,
        system_accounts::COGS,
        system_accounts::INVENTORY,
    ] {
        assert_eq!(
            balance_of(&db, fx.company_id, name).await,
            dec!(0.00),
            "account {name} should net to zero"
        );
    }

    // A second credit note is rejected.
    let err = CreditNoteRepository::new(db.clone())
        .create_credit_note(fx.company_id, finalized.invoice.id, today(), "again")
        .await
        .expect_err("second credit note must fail");
    assert!(matches!(
        err,
        khata_db::repositories::CreditNoteError::Invoice(InvoiceError::AlreadyCredited)
    ));
}

#[tokio::test]
async fn test_duplicate_shipment_invoice_conflict() {
    let Some(db) = connect().await else { return };
    let fx = setup(&db, dec!(1), dec!(100)).await;
    let invoices = InvoiceRepository::new(db.clone());

    invoices
        .create_draft(fx.company_id, fx.shipment_id, today())
        .await
        .expect("first draft");

    let err = invoices
        .create_draft(fx.company_id, fx.shipment_id, today())
        .await
        .expect_err("second invoice for the same shipment must fail");
    assert!(matches!(err, InvoiceRepoError::InvoiceAlreadyExists(id) if id == fx.shipment_id));
}

#[tokio::test]
async fn test_finalize_is_not_repeatable() {
    let Some(db) = connect().await else { return };
    let fx = setup(&db, dec!(1), dec!(100)).await;
    let invoices = InvoiceRepository::new(db.clone());

    let draft = invoices
        .create_draft(fx.company_id, fx.shipment_id, today())
        .await
        .expect("draft");
    invoices
        .finalize(fx.company_id, draft.invoice.id, FinalizeInput::default())
        .await
        .expect("finalize");

    let err = invoices
        .finalize(fx.company_id, draft.invoice.id, FinalizeInput::default())
        .await
        .expect_err("second finalize must fail");
    assert!(matches!(
        err,
        InvoiceRepoError::Invoice(InvoiceError::NotDraft { .. })
    ));

    // And the ledger posted exactly once.
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::ACCOUNTS_RECEIVABLE).await,
        dec!(118.00)
    );
}

#[tokio::test]
async fn test_concurrent_finalize_single_winner() {
    let Some(db) = connect().await else { return };
    let fx = setup(&db, dec!(10), dec!(100)).await;
    let invoices = InvoiceRepository::new(db.clone());

    let draft = invoices
        .create_draft(fx.company_id, fx.shipment_id, today())
        .await
        .expect("draft");

    let run = || {
        let repo = InvoiceRepository::new(db.clone());
        let invoice_id = draft.invoice.id;
        let company_id = fx.company_id;
        async move {
            repo.finalize(company_id, invoice_id, FinalizeInput::default())
                .await
        }
    };

    let (first, second) = futures::join!(run(), run());
    let successes = usize::from(first.is_ok()) + usize::from(second.is_ok());
    assert_eq!(successes, 1, "exactly one finalize must win");

    // The loser reports the state it actually observed.
    let loser = if first.is_err() { first } else { second };
    assert!(matches!(
        loser,
        Err(InvoiceRepoError::Invoice(InvoiceError::NotDraft { ref status })) if status.as_str() == "finalized"
    ));

    // And the ledger posted exactly once.
    assert_eq!(
        balance_of(&db, fx.company_id, system_accounts::ACCOUNTS_RECEIVABLE).await,
        dec!(1180.00)
    );
}

#[tokio::test]
async fn test_cash_limit_enforced() {
    let Some(db) = connect().await else { return };
    // 2000 x 200 = 400,000 + GST.
    let fx = setup(&db, dec!(2000), dec!(200)).await;
    let invoices = InvoiceRepository::new(db.clone());

    let finalized = invoices
        .create_and_finalize(
            fx.company_id,
            fx.shipment_id,
            today(),
            FinalizeInput::default(),
        )
        .await
        .expect("finalize");

    let err = PaymentRepository::new(db.clone())
        .record_payment(
            fx.company_id,
            RecordPaymentInput {
                invoice_id: finalized.invoice.id,
                amount: dec!(250000),
                method: PaymentMethod::Cash,
                payment_date: today(),
                reference: None,
            },
        )
        .await
        .expect_err("cash above the 269ST limit must fail");
    assert!(matches!(
        err,
        PaymentRepoError::Payment(PaymentError::CashLimitExceeded { .. })
    ));

    // A bank transfer of the same amount goes through.
    PaymentRepository::new(db.clone())
        .record_payment(
            fx.company_id,
            RecordPaymentInput {
                invoice_id: finalized.invoice.id,
                amount: dec!(250000),
                method: PaymentMethod::BankTransfer,
                payment_date: today(),
                reference: Some("UTR-99".into()),
            },
        )
        .await
        .expect("bank transfer");
}

#[tokio::test]
async fn test_concurrent_payments_cannot_overpay() {
    let Some(db) = connect().await else { return };
    let fx = setup(&db, dec!(10), dec!(100)).await;
    let invoices = InvoiceRepository::new(db.clone());

    let finalized = invoices
        .create_and_finalize(
            fx.company_id,
            fx.shipment_id,
            today(),
            FinalizeInput::default(),
        )
        .await
        .expect("finalize");

    // Two 700s against an 1180 balance: at most one can land.
    let pay = |amount| {
        let payments = PaymentRepository::new(db.clone());
        let invoice_id = finalized.invoice.id;
        let company_id = fx.company_id;
        async move {
            payments
                .record_payment(
                    company_id,
                    RecordPaymentInput {
                        invoice_id,
                        amount,
                        method: PaymentMethod::Upi,
                        payment_date: today(),
                        reference: None,
                    },
                )
                .await
        }
    };

    let (first, second) = futures::join!(pay(dec!(700)), pay(dec!(700)));
    let successes = usize::from(first.is_ok()) + usize::from(second.is_ok());
    assert_eq!(successes, 1, "exactly one payment must win");

    let invoice = invoices
        .get(fx.company_id, finalized.invoice.id)
        .await
        .expect("reload");
    assert_eq!(invoice.invoice.total_paid, dec!(700.00));
    assert_eq!(invoice.invoice.balance_due, dec!(480.00));
}

#[tokio::test]
async fn test_delete_draft_only() {
    let Some(db) = connect().await else { return };
    let fx = setup(&db, dec!(1), dec!(100)).await;
    let invoices = InvoiceRepository::new(db.clone());

    let draft = invoices
        .create_draft(fx.company_id, fx.shipment_id, today())
        .await
        .expect("draft");
    invoices
        .delete_draft(fx.company_id, draft.invoice.id)
        .await
        .expect("delete draft");

    // The shipment is free again after the draft is gone.
    let again = invoices
        .create_draft(fx.company_id, fx.shipment_id, today())
        .await
        .expect("re-draft");
    invoices
        .finalize(fx.company_id, again.invoice.id, FinalizeInput::default())
        .await
        .expect("finalize");

    let err = invoices
        .delete_draft(fx.company_id, again.invoice.id)
        .await
        .expect_err("finalized invoices are not deletable");
    assert!(matches!(
        err,
        InvoiceRepoError::Invoice(InvoiceError::CanOnlyDeleteDraft)
    ));
}
