//! Initial database migration.
//!
//! Creates the billing schema: centers, students, courses, groups,
//! enrollments, discounts, payments, expenses, period closings, and the
//! per-(center, year, month) receipt counters.

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
        // PART 2: TENANT & CATALOG TABLES
        // ============================================================
        db.execute_unprepared(CENTERS_SQL).await?;
        db.execute_unprepared(STUDENTS_SQL).await?;
        db.execute_unprepared(COURSES_SQL).await?;
        db.execute_unprepared(GROUPS_SQL).await?;
        db.execute_unprepared(ENROLLMENTS_SQL).await?;

        // ============================================================
        // PART 3: BILLING TABLES
        // ============================================================
        db.execute_unprepared(DISCOUNTS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 4: PERIOD STATE
        // ============================================================
        db.execute_unprepared(PERIOD_CLOSINGS_SQL).await?;
        db.execute_unprepared(RECEIPT_COUNTERS_SQL).await?;

        // ============================================================
        // PART 5: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
-- Payment method
CREATE TYPE payment_method AS ENUM (
    'cash',
    'card',
    'bank_transfer',
    'other'
);

-- Recorded payment status (not reconciled with an external processor)
CREATE TYPE payment_status AS ENUM (
    'pending',
    'paid',
    'failed'
);

-- Expense category; refunds are expenses of category 'refund'
CREATE TYPE expense_category AS ENUM (
    'general',
    'refund'
);
";

const CENTERS_SQL: &str = r"
CREATE TABLE centers (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY,
    center_id UUID NOT NULL REFERENCES centers(id),
    full_name TEXT NOT NULL,
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const COURSES_SQL: &str = r"
CREATE TABLE courses (
    id UUID PRIMARY KEY,
    center_id UUID NOT NULL REFERENCES centers(id),
    name TEXT NOT NULL,
    price NUMERIC(19, 4) NOT NULL CHECK (price >= 0),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const GROUPS_SQL: &str = r"
CREATE TABLE groups (
    id UUID PRIMARY KEY,
    center_id UUID NOT NULL REFERENCES centers(id),
    course_id UUID NOT NULL REFERENCES courses(id),
    name TEXT NOT NULL,
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ENROLLMENTS_SQL: &str = r"
CREATE TABLE enrollments (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL REFERENCES students(id),
    group_id UUID NOT NULL REFERENCES groups(id),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const DISCOUNTS_SQL: &str = r"
CREATE TABLE discounts (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL REFERENCES students(id),
    group_id UUID NOT NULL REFERENCES groups(id),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount >= 0),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one active discount per (student, group) pair
CREATE UNIQUE INDEX idx_discounts_active_pair
    ON discounts (student_id, group_id)
    WHERE NOT is_deleted;
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    center_id UUID REFERENCES centers(id),
    student_id UUID NOT NULL REFERENCES students(id),
    group_id UUID NOT NULL REFERENCES groups(id),
    receipt_number TEXT NOT NULL UNIQUE,
    original_amount NUMERIC(19, 4) NOT NULL CHECK (original_amount >= 0),
    discount_amount NUMERIC(19, 4) NOT NULL CHECK (discount_amount >= 0),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount >= 0),
    method payment_method NOT NULL,
    transaction_ref TEXT,
    description TEXT,
    status payment_status NOT NULL,
    paid_at TIMESTAMPTZ NOT NULL,
    billing_month INTEGER NOT NULL CHECK (billing_month BETWEEN 1 AND 12),
    billing_year INTEGER NOT NULL,
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Snapshots must stay internally consistent
    CONSTRAINT chk_discount_le_original CHECK (discount_amount <= original_amount),
    CONSTRAINT chk_paid_le_payable CHECK (amount <= original_amount - discount_amount)
);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    center_id UUID NOT NULL REFERENCES centers(id),
    category expense_category NOT NULL DEFAULT 'general',
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    description TEXT,
    payment_id UUID REFERENCES payments(id),
    expense_month INTEGER NOT NULL CHECK (expense_month BETWEEN 1 AND 12),
    expense_year INTEGER NOT NULL,
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PERIOD_CLOSINGS_SQL: &str = r"
CREATE TABLE period_closings (
    id UUID PRIMARY KEY,
    center_id UUID NOT NULL REFERENCES centers(id),
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    closed_by UUID NOT NULL,
    closed_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_period_closings_scope UNIQUE (center_id, year, month)
);
";

const RECEIPT_COUNTERS_SQL: &str = r"
CREATE TABLE receipt_counters (
    center_id UUID NOT NULL REFERENCES centers(id),
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    last_value BIGINT NOT NULL DEFAULT 0,

    CONSTRAINT pk_receipt_counters PRIMARY KEY (center_id, year, month)
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_enrollments_pair ON enrollments (student_id, group_id);
CREATE INDEX idx_payments_student_period
    ON payments (student_id, billing_year, billing_month);
CREATE INDEX idx_payments_center_period
    ON payments (center_id, billing_year, billing_month);
CREATE INDEX idx_expenses_payment ON expenses (payment_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS receipt_counters;
DROP TABLE IF EXISTS period_closings;
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS payments;
DROP TABLE IF EXISTS discounts;
DROP TABLE IF EXISTS enrollments;
DROP TABLE IF EXISTS groups;
DROP TABLE IF EXISTS courses;
DROP TABLE IF EXISTS students;
DROP TABLE IF EXISTS centers;

DROP TYPE IF EXISTS expense_category;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS payment_method;
";
