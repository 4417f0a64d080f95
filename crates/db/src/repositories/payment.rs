//! Payment engine repository.
//!
//! The single owner of payment record creation. Validates eligibility,
//! consults the discount ledger preview and the period closing guard,
//! allocates receipt numbers, and persists one or many payment records with
//! immutable snapshots of original/discount/paid amounts.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use centra_core::billing::{
    resolve_charge, validate_batch_request, BillingError, BillingPeriod, PaymentPreview,
    TenantScope,
};

use crate::entities::{
    centers, courses, enrollments, groups, payments,
    sea_orm_active_enums::{PaymentMethod, PaymentStatus},
};
use crate::repositories::{discount, period, receipt};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// No active enrollment link for the (student, group) pair.
    #[error("no active enrollment for student {student_id} in group {group_id}")]
    EnrollmentNotFound {
        /// Student ID.
        student_id: Uuid,
        /// Group ID.
        group_id: Uuid,
    },

    /// Group absent or deleted.
    #[error("group not found: {0}")]
    GroupNotFound(Uuid),

    /// The group's course absent or deleted.
    #[error("course not found: {0}")]
    CourseNotFound(Uuid),

    /// The course's center could not be resolved.
    #[error("center not found: {0}")]
    CenterNotFound(Uuid),

    /// Payment record absent or deleted.
    #[error("payment not found: {0}")]
    NotFound(Uuid),

    /// A target period is locked against financial mutations.
    #[error("accounting period {period} is closed")]
    PeriodClosed {
        /// The locked period.
        period: BillingPeriod,
    },

    /// Monetary or structural invariant violated.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a payment (single month or multi-month batch).
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Student being charged.
    pub student_id: Uuid,
    /// Billing group.
    pub group_id: Uuid,
    /// First billed month (1..=12).
    pub month: u32,
    /// First billed year.
    pub year: i32,
    /// Number of consecutive periods to bill; 1 for a single payment.
    pub months_count: u32,
    /// Explicit charge amount; only valid for single-month payments.
    /// Defaults to the full payable amount.
    pub amount: Option<Decimal>,
    /// Payment method.
    pub method: PaymentMethod,
    /// External transaction reference, if any.
    pub transaction_ref: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Recorded status.
    pub status: PaymentStatus,
    /// User recording the payment.
    pub created_by: Uuid,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates one payment record per billed period and returns the last one.
    ///
    /// Single-month payments may carry an explicit (partial) amount;
    /// multi-month batches always charge the full payable amount per period.
    /// The whole batch executes inside one database transaction: if any
    /// period is closed or fails its preview, no record is persisted and no
    /// receipt number is consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The months count / explicit amount combination is invalid
    /// - No active enrollment link exists
    /// - The group, course, or center cannot be resolved
    /// - The caller's scope does not cover the resolved center
    /// - Any target period is closed
    /// - The charge violates a monetary invariant
    /// - A database operation fails
    pub async fn create_payment(
        &self,
        input: CreatePaymentInput,
        scope: &TenantScope,
    ) -> Result<payments::Model, PaymentError> {
        validate_batch_request(input.months_count, input.amount)?;
        let start = BillingPeriod::new(input.year, input.month)?;

        let enrollment = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(input.student_id))
            .filter(enrollments::Column::GroupId.eq(input.group_id))
            .filter(enrollments::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        if enrollment.is_none() {
            return Err(PaymentError::EnrollmentNotFound {
                student_id: input.student_id,
                group_id: input.group_id,
            });
        }

        let group = groups::Entity::find_by_id(input.group_id)
            .filter(groups::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(PaymentError::GroupNotFound(input.group_id))?;

        let course = courses::Entity::find_by_id(group.course_id)
            .filter(courses::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(PaymentError::CourseNotFound(group.course_id))?;

        let center = centers::Entity::find_by_id(course.center_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentError::CenterNotFound(course.center_id))?;

        scope.authorize(center.id)?;

        let periods = start.span(input.months_count)?;

        // One transaction for the whole batch: any failure rolls back every
        // record and every receipt counter increment.
        let txn = self.db.begin().await?;
        let mut records = Vec::with_capacity(periods.len());

        for billed in periods {
            let record = self
                .insert_period_payment(&txn, &input, &center, course.price, billed)
                .await?;
            records.push(record);
        }

        txn.commit().await?;

        records
            .pop()
            .ok_or_else(|| BillingError::InvalidMonthsCount(0).into())
    }

    /// Validates one billed period and inserts its payment record.
    async fn insert_period_payment(
        &self,
        txn: &DatabaseTransaction,
        input: &CreatePaymentInput,
        center: &centers::Model,
        price: Decimal,
        billed: BillingPeriod,
    ) -> Result<payments::Model, PaymentError> {
        if period::is_closed_on(txn, center.id, billed).await? {
            return Err(PaymentError::PeriodClosed { period: billed });
        }

        // Re-run the preview for this specific period; the discount may have
        // no period-specific variation today, but the snapshot is taken per
        // record regardless.
        let discount =
            discount::latest_discount_amount(txn, input.student_id, input.group_id).await?;
        let preview = PaymentPreview::compute(price, discount);
        let charge = resolve_charge(&preview, input.amount)?;

        let receipt_number =
            receipt::next_receipt_number(txn, center.id, &center.code, billed).await?;

        #[allow(clippy::cast_possible_wrap)]
        let billing_month = billed.month() as i32;
        let now = Utc::now().into();

        let record = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            center_id: Set(Some(center.id)),
            student_id: Set(input.student_id),
            group_id: Set(input.group_id),
            receipt_number: Set(receipt_number),
            original_amount: Set(preview.original),
            discount_amount: Set(preview.discount),
            amount: Set(charge),
            method: Set(input.method.clone()),
            transaction_ref: Set(input.transaction_ref.clone()),
            description: Set(input.description.clone()),
            status: Set(input.status.clone()),
            paid_at: Set(now),
            billing_month: Set(billing_month),
            billing_year: Set(billed.year()),
            is_deleted: Set(false),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = record.insert(txn).await?;
        Ok(inserted)
    }

    /// Finds a non-deleted payment by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record is absent or soft-deleted.
    pub async fn find_by_id(&self, payment_id: Uuid) -> Result<payments::Model, PaymentError> {
        payments::Entity::find_by_id(payment_id)
            .filter(payments::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(PaymentError::NotFound(payment_id))
    }
}
