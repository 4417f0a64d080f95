//! Refund processor repository.
//!
//! Reverses funds for a prior payment by recording a bounded expense of
//! category `refund`. The original payment record is never mutated; the
//! reversing entry is booked against the period current at refund time, not
//! the payment's original billing period.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use centra_core::billing::{validate_refund, BillingError, BillingPeriod, TenantScope};

use crate::entities::{courses, expenses, groups, payments, sea_orm_active_enums::ExpenseCategory};
use crate::repositories::period;

/// Error types for refund operations.
#[derive(Debug, thiserror::Error)]
pub enum RefundError {
    /// Payment record absent or deleted.
    #[error("payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Neither the payment nor its group's course yields a center.
    #[error("cannot resolve a center for payment {0}")]
    CenterUnresolved(Uuid),

    /// The current accounting period is locked.
    #[error("accounting period {period} is closed")]
    PeriodClosed {
        /// The locked period.
        period: BillingPeriod,
    },

    /// Monetary invariant violated.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for refunding a payment.
#[derive(Debug, Clone)]
pub struct RefundInput {
    /// The payment being reversed.
    pub payment_id: Uuid,
    /// Refund amount; must not exceed the payment's paid amount.
    pub amount: Decimal,
    /// Optional reason, stored on the reversing entry.
    pub reason: Option<String>,
    /// User recording the refund.
    pub requested_by: Uuid,
}

/// Refund repository: the single owner of reversing-entry creation.
#[derive(Debug, Clone)]
pub struct RefundRepository {
    db: DatabaseConnection,
}

impl RefundRepository {
    /// Creates a new refund repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a bounded reversing entry for a prior payment.
    ///
    /// `current` is the period the refund is booked against -- the calendar
    /// period at refund time, supplied by the caller so the repository stays
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive or exceeds the payment's paid amount
    /// - The payment is absent/deleted
    /// - No center can be resolved for the payment
    /// - The caller's scope does not cover the resolved center
    /// - The current period is closed
    /// - A database operation fails
    pub async fn refund(
        &self,
        input: RefundInput,
        scope: &TenantScope,
        current: BillingPeriod,
    ) -> Result<expenses::Model, RefundError> {
        if input.amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveCharge(input.amount).into());
        }

        let payment = payments::Entity::find_by_id(input.payment_id)
            .filter(payments::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(RefundError::PaymentNotFound(input.payment_id))?;

        let center_id = self.resolve_center(&payment).await?;
        scope.authorize(center_id)?;

        if period::is_closed_on(&self.db, center_id, current).await? {
            return Err(RefundError::PeriodClosed { period: current });
        }

        validate_refund(payment.amount, input.amount)?;

        #[allow(clippy::cast_possible_wrap)]
        let expense_month = current.month() as i32;
        let now = Utc::now().into();

        let description = input.reason.unwrap_or_else(|| {
            format!("Refund of receipt {}", payment.receipt_number)
        });

        let entry = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            center_id: Set(center_id),
            category: Set(ExpenseCategory::Refund),
            amount: Set(input.amount),
            description: Set(Some(description)),
            payment_id: Set(Some(payment.id)),
            expense_month: Set(expense_month),
            expense_year: Set(current.year()),
            is_deleted: Set(false),
            created_by: Set(input.requested_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = entry.insert(&self.db).await?;
        Ok(inserted)
    }

    /// Resolves the payment's center, falling back to its group's course.
    async fn resolve_center(&self, payment: &payments::Model) -> Result<Uuid, RefundError> {
        if let Some(center_id) = payment.center_id {
            return Ok(center_id);
        }

        let group = groups::Entity::find_by_id(payment.group_id)
            .one(&self.db)
            .await?;

        let Some(group) = group else {
            return Err(RefundError::CenterUnresolved(payment.id));
        };

        let course = courses::Entity::find_by_id(group.course_id)
            .one(&self.db)
            .await?;

        course
            .map(|c| c.center_id)
            .ok_or(RefundError::CenterUnresolved(payment.id))
    }
}
