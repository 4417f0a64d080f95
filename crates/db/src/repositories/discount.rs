//! Discount ledger repository.
//!
//! Owns all discount record mutation: assignment with update-in-place
//! semantics, partial updates, soft removal, and the payable preview consumed
//! by the payment engine.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use centra_core::billing::{BillingError, BillingPeriod, PaymentPreview};

use crate::entities::{courses, discounts, enrollments, groups};

/// Error types for discount operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscountError {
    /// No active enrollment link for the (student, group) pair.
    #[error("no active enrollment for student {student_id} in group {group_id}")]
    EnrollmentNotFound {
        /// Student ID.
        student_id: Uuid,
        /// Group ID.
        group_id: Uuid,
    },

    /// Discount record absent or already deleted.
    #[error("discount not found: {0}")]
    NotFound(Uuid),

    /// Group absent or deleted.
    #[error("group not found: {0}")]
    GroupNotFound(Uuid),

    /// The group's course absent or deleted.
    #[error("course not found: {0}")]
    CourseNotFound(Uuid),

    /// Monetary invariant violated.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Whether an assignment created a new record or updated the active one.
#[derive(Debug, Clone)]
pub enum AssignOutcome {
    /// First assignment for the pair; a new record was created.
    Created(discounts::Model),
    /// An active record existed and was updated in place.
    Updated(discounts::Model),
}

impl AssignOutcome {
    /// The record regardless of outcome.
    #[must_use]
    pub const fn record(&self) -> &discounts::Model {
        match self {
            Self::Created(m) | Self::Updated(m) => m,
        }
    }
}

/// Discount repository: the single owner of discount record mutation.
#[derive(Debug, Clone)]
pub struct DiscountRepository {
    db: DatabaseConnection,
}

impl DiscountRepository {
    /// Creates a new discount repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns a discount to a (student, group) pair.
    ///
    /// If an active discount already exists for the pair, its amount is
    /// overwritten in place and `updated_at` stamped; otherwise a new record
    /// is created. At most one active record per pair exists at any time.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is negative
    /// - No active enrollment link exists for the pair
    /// - Database operation fails
    pub async fn assign_discount(
        &self,
        student_id: Uuid,
        group_id: Uuid,
        amount: Decimal,
    ) -> Result<AssignOutcome, DiscountError> {
        if amount < Decimal::ZERO {
            return Err(BillingError::NegativeAmount.into());
        }

        let enrollment = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::GroupId.eq(group_id))
            .filter(enrollments::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        if enrollment.is_none() {
            return Err(DiscountError::EnrollmentNotFound {
                student_id,
                group_id,
            });
        }

        let now = Utc::now().into();
        let existing = active_discount(&self.db, student_id, group_id).await?;

        if let Some(existing) = existing {
            let mut active: discounts::ActiveModel = existing.into();
            active.amount = Set(amount);
            active.updated_at = Set(now);
            let updated = active.update(&self.db).await?;
            return Ok(AssignOutcome::Updated(updated));
        }

        let record = discounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            group_id: Set(group_id),
            amount: Set(amount),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = record.insert(&self.db).await?;
        Ok(AssignOutcome::Created(inserted))
    }

    /// Partially updates an active discount record.
    ///
    /// An omitted amount leaves the current value unchanged (but still stamps
    /// `updated_at`).
    ///
    /// # Errors
    ///
    /// Returns an error if the record is absent/deleted, the amount is
    /// negative, or the database operation fails.
    pub async fn update_discount(
        &self,
        discount_id: Uuid,
        new_amount: Option<Decimal>,
    ) -> Result<discounts::Model, DiscountError> {
        if let Some(amount) = new_amount {
            if amount < Decimal::ZERO {
                return Err(BillingError::NegativeAmount.into());
            }
        }

        let record = discounts::Entity::find_by_id(discount_id)
            .filter(discounts::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(DiscountError::NotFound(discount_id))?;

        let mut active: discounts::ActiveModel = record.into();
        if let Some(amount) = new_amount {
            active.amount = Set(amount);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Soft-deletes a discount record, preserving audit history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record is absent or already deleted.
    pub async fn remove_discount(&self, discount_id: Uuid) -> Result<(), DiscountError> {
        let record = discounts::Entity::find_by_id(discount_id)
            .filter(discounts::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(DiscountError::NotFound(discount_id))?;

        let mut active: discounts::ActiveModel = record.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Computes the net payable amount for a (student, group) pair.
    ///
    /// Resolves the group's course base price as the original amount and the
    /// most-recently-updated active discount for the pair (zero if none),
    /// capped at the price. Pure read; no side effects.
    ///
    /// `period` is accepted for forward compatibility with period-varying
    /// pricing but does not currently affect the computation.
    ///
    /// # Errors
    ///
    /// Returns an error if the group or its course cannot be resolved, or the
    /// database query fails.
    pub async fn preview_payable(
        &self,
        student_id: Uuid,
        group_id: Uuid,
        _period: BillingPeriod,
    ) -> Result<PaymentPreview, DiscountError> {
        let group = groups::Entity::find_by_id(group_id)
            .filter(groups::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(DiscountError::GroupNotFound(group_id))?;

        let course = courses::Entity::find_by_id(group.course_id)
            .filter(courses::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or(DiscountError::CourseNotFound(group.course_id))?;

        let discount = latest_discount_amount(&self.db, student_id, group_id).await?;

        Ok(PaymentPreview::compute(course.price, discount))
    }
}

/// Finds the active discount record for a (student, group) pair, if any.
pub(crate) async fn active_discount<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
    group_id: Uuid,
) -> Result<Option<discounts::Model>, DbErr> {
    discounts::Entity::find()
        .filter(discounts::Column::StudentId.eq(student_id))
        .filter(discounts::Column::GroupId.eq(group_id))
        .filter(discounts::Column::IsDeleted.eq(false))
        .order_by_desc(discounts::Column::UpdatedAt)
        .limit(1)
        .one(conn)
        .await
}

/// The most-recently-updated active discount amount, or zero if none exists.
pub(crate) async fn latest_discount_amount<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
    group_id: Uuid,
) -> Result<Decimal, DbErr> {
    let record = active_discount(conn, student_id, group_id).await?;
    Ok(record.map_or(Decimal::ZERO, |d| d.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn model(amount: Decimal) -> discounts::Model {
        let now = chrono::Utc::now().into();
        discounts::Model {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            amount,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_assign_outcome_exposes_record(#[case] created: bool) {
        let record = model(dec!(150));
        let outcome = if created {
            AssignOutcome::Created(record.clone())
        } else {
            AssignOutcome::Updated(record.clone())
        };
        assert_eq!(outcome.record(), &record);
    }

    #[test]
    fn test_billing_error_maps_into_discount_error() {
        let err = DiscountError::from(BillingError::NegativeAmount);
        assert!(matches!(err, DiscountError::Billing(BillingError::NegativeAmount)));
    }
}
