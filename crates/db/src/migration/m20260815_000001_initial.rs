//! Initial database migration.
//!
//! Creates all billing and ledger tables, enums, constraints, and triggers.
//! Accounting invariants that can be expressed in SQL are enforced here as
//! CHECK constraints and unique indexes; everything else lives in the
//! repositories.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANCY
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;

        // ============================================================
        // PART 3: SOURCE DOCUMENTS
        // ============================================================
        db.execute_unprepared(SHIPMENTS_SQL).await?;
        db.execute_unprepared(SHIPMENT_ITEMS_SQL).await?;

        // ============================================================
        // PART 4: CHART OF ACCOUNTS & TAX CONFIG
        // ============================================================
        db.execute_unprepared(LEDGER_ACCOUNTS_SQL).await?;
        db.execute_unprepared(TAX_RATES_SQL).await?;

        // ============================================================
        // PART 5: DOCUMENT NUMBERING
        // ============================================================
        db.execute_unprepared(DOCUMENT_SEQUENCES_SQL).await?;

        // ============================================================
        // PART 6: INVOICING
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_LINES_SQL).await?;

        // ============================================================
        // PART 7: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 8: PAYMENTS
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 9: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Invoice lifecycle
CREATE TYPE invoice_status AS ENUM ('draft', 'finalized', 'credited');

-- Invoice payment state
CREATE TYPE payment_status AS ENUM ('unpaid', 'partial', 'paid');

-- Document kind
CREATE TYPE invoice_kind AS ENUM ('tax_invoice', 'credit_note');

-- Ledger account classification
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'income',
    'expense',
    'equity'
);

-- Payment methods
CREATE TYPE payment_method AS ENUM (
    'cash',
    'cheque',
    'bank_transfer',
    'upi',
    'card',
    'neft_rtgs',
    'imps',
    'others'
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    gstin VARCHAR(15),
    state VARCHAR(100) NOT NULL,
    default_gst_rate NUMERIC(5, 2) NOT NULL DEFAULT 18.00,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_companies_default_rate CHECK (default_gst_rate >= 0)
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    state VARCHAR(100) NOT NULL,
    gstin VARCHAR(15),
    billing_address TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_customers_company ON customers(company_id);
";

const SHIPMENTS_SQL: &str = r"
CREATE TABLE shipments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    customer_id UUID REFERENCES customers(id),
    dispatch_number VARCHAR(50) NOT NULL,
    dispatch_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_shipments_number UNIQUE (company_id, dispatch_number)
);

CREATE INDEX idx_shipments_company ON shipments(company_id);
";

const SHIPMENT_ITEMS_SQL: &str = r"
CREATE TABLE shipment_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    shipment_id UUID NOT NULL REFERENCES shipments(id) ON DELETE CASCADE,
    product_name VARCHAR(255) NOT NULL,
    hsn_code VARCHAR(10),
    quantity NUMERIC(12, 3) NOT NULL,
    selling_price NUMERIC(14, 2),
    cost_price NUMERIC(14, 2),
    discount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_shipment_items_quantity CHECK (quantity <> 0),
    CONSTRAINT chk_shipment_items_discount CHECK (discount >= 0)
);

CREATE INDEX idx_shipment_items_shipment ON shipment_items(shipment_id);
";

const LEDGER_ACCOUNTS_SQL: &str = r"
CREATE TABLE ledger_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    current_balance NUMERIC(16, 2) NOT NULL DEFAULT 0,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_ledger_accounts_name UNIQUE (company_id, name)
);

CREATE INDEX idx_ledger_accounts_company ON ledger_accounts(company_id);
";

const TAX_RATES_SQL: &str = r"
CREATE TABLE tax_rates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    hsn_code VARCHAR(10) NOT NULL,
    rate_percent NUMERIC(5, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_tax_rates_hsn UNIQUE (company_id, hsn_code),
    CONSTRAINT chk_tax_rates_rate CHECK (rate_percent >= 0)
);
";

const DOCUMENT_SEQUENCES_SQL: &str = r"
-- One counter row per (company, document type, period). Numbers are
-- allocated with an atomic upsert-returning, never read-then-write.
CREATE TABLE document_sequences (
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    doc_type VARCHAR(20) NOT NULL,
    period_key VARCHAR(10) NOT NULL,
    last_value BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    PRIMARY KEY (company_id, doc_type, period_key)
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    number VARCHAR(50) NOT NULL,
    customer_id UUID NOT NULL REFERENCES customers(id),
    shipment_id UUID REFERENCES shipments(id),
    invoice_date DATE NOT NULL,
    kind invoice_kind NOT NULL DEFAULT 'tax_invoice',
    credit_note_for UUID REFERENCES invoices(id),
    subtotal NUMERIC(16, 2) NOT NULL DEFAULT 0,
    discount_total NUMERIC(16, 2) NOT NULL DEFAULT 0,
    cgst_total NUMERIC(16, 2) NOT NULL DEFAULT 0,
    sgst_total NUMERIC(16, 2) NOT NULL DEFAULT 0,
    igst_total NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_amount NUMERIC(16, 2) NOT NULL DEFAULT 0,
    status invoice_status NOT NULL DEFAULT 'draft',
    payment_status payment_status NOT NULL DEFAULT 'unpaid',
    total_paid NUMERIC(16, 2) NOT NULL DEFAULT 0,
    balance_due NUMERIC(16, 2) NOT NULL DEFAULT 0,
    finalized_at TIMESTAMPTZ,
    finalized_by UUID,
    transport_details TEXT,
    eway_bill_number VARCHAR(50),
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_invoices_number UNIQUE (company_id, number),
    -- Balances never go negative; the payment guard relies on this as a
    -- final backstop.
    CONSTRAINT chk_invoices_balance CHECK (balance_due >= 0),
    CONSTRAINT chk_invoices_paid CHECK (total_paid >= 0)
);

-- At most one invoice per shipment (tax invoices only; credit notes have
-- no shipment).
CREATE UNIQUE INDEX uq_invoices_shipment
    ON invoices(company_id, shipment_id)
    WHERE shipment_id IS NOT NULL;

CREATE INDEX idx_invoices_company ON invoices(company_id);
CREATE INDEX idx_invoices_customer ON invoices(customer_id);
";

const INVOICE_LINES_SQL: &str = r"
CREATE TABLE invoice_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    product_name VARCHAR(255) NOT NULL,
    hsn_code VARCHAR(10),
    quantity NUMERIC(12, 3) NOT NULL,
    unit_rate NUMERIC(14, 2) NOT NULL,
    discount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    taxable_value NUMERIC(16, 2) NOT NULL,
    cgst_rate NUMERIC(5, 2) NOT NULL DEFAULT 0,
    cgst_amount NUMERIC(16, 2) NOT NULL DEFAULT 0,
    sgst_rate NUMERIC(5, 2) NOT NULL DEFAULT 0,
    sgst_amount NUMERIC(16, 2) NOT NULL DEFAULT 0,
    igst_rate NUMERIC(5, 2) NOT NULL DEFAULT 0,
    igst_amount NUMERIC(16, 2) NOT NULL DEFAULT 0,
    line_total NUMERIC(16, 2) NOT NULL,
    cost_price NUMERIC(14, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_invoice_lines_no UNIQUE (invoice_id, line_no),
    CONSTRAINT chk_invoice_lines_quantity CHECK (quantity <> 0)
);

CREATE INDEX idx_invoice_lines_invoice ON invoice_lines(invoice_id);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    entry_number VARCHAR(50) NOT NULL,
    entry_date DATE NOT NULL,
    source_type VARCHAR(20) NOT NULL,
    source_id UUID NOT NULL,
    narration TEXT NOT NULL,
    total_debit NUMERIC(16, 2) NOT NULL,
    total_credit NUMERIC(16, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_journal_entries_number UNIQUE (company_id, entry_number),
    -- Idempotent posting: a given source document posts at most once per
    -- source type.
    CONSTRAINT uq_journal_entries_source UNIQUE (company_id, source_type, source_id),
    CONSTRAINT chk_journal_entries_source_type CHECK (
        source_type IN ('invoice', 'cogs', 'payment', 'credit_note', 'manual')
    )
);

CREATE INDEX idx_journal_entries_company ON journal_entries(company_id);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES ledger_accounts(id),
    debit NUMERIC(16, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(16, 2) NOT NULL DEFAULT 0,
    bill_ref VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_journal_lines_no UNIQUE (entry_id, line_no),
    CONSTRAINT chk_journal_lines_non_negative CHECK (debit >= 0 AND credit >= 0),
    -- Exactly one side per line.
    CONSTRAINT chk_journal_lines_one_side CHECK ((debit = 0) <> (credit = 0))
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(entry_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    payment_number VARCHAR(50) NOT NULL,
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    amount NUMERIC(16, 2) NOT NULL,
    method payment_method NOT NULL,
    payment_date DATE NOT NULL,
    reference VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_payments_number UNIQUE (company_id, payment_number),
    CONSTRAINT chk_payments_amount CHECK (amount > 0)
);

CREATE INDEX idx_payments_invoice ON payments(invoice_id);
";

const TRIGGERS_SQL: &str = r"
-- Touch updated_at on modification
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_companies_updated_at
    BEFORE UPDATE ON companies
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_customers_updated_at
    BEFORE UPDATE ON customers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_shipments_updated_at
    BEFORE UPDATE ON shipments
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_ledger_accounts_updated_at
    BEFORE UPDATE ON ledger_accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_tax_rates_updated_at
    BEFORE UPDATE ON tax_rates
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_invoices_updated_at
    BEFORE UPDATE ON invoices
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS invoice_lines CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS document_sequences CASCADE;
DROP TABLE IF EXISTS tax_rates CASCADE;
DROP TABLE IF EXISTS ledger_accounts CASCADE;
DROP TABLE IF EXISTS shipment_items CASCADE;
DROP TABLE IF EXISTS shipments CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS companies CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS account_type;
DROP TYPE IF EXISTS invoice_kind;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS invoice_status;
";
