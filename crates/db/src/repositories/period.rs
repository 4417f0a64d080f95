//! Period closing repository.
//!
//! Answers "is accounting period (center, year, month) closed?" for the
//! payment engine and refund processor, and manages the closing marker
//! itself. The guard check and any subsequent write are deliberately not
//! atomic with respect to a concurrent close; the narrow race is accepted
//! rather than serializing all writes behind period state.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use centra_core::billing::BillingPeriod;

use crate::entities::period_closings;

/// Error types for period closing operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    /// Closing an already-closed period.
    #[error("period {period} is already closed")]
    AlreadyClosed {
        /// The period in question.
        period: BillingPeriod,
    },

    /// Reopening a period that is not closed.
    #[error("period {period} is not closed")]
    NotClosed {
        /// The period in question.
        period: BillingPeriod,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Period closing repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether the accounting period is locked for the center.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_closed(
        &self,
        center_id: Uuid,
        period: BillingPeriod,
    ) -> Result<bool, PeriodError> {
        Ok(is_closed_on(&self.db, center_id, period).await?)
    }

    /// Locks the period against further financial mutations.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` if a closing marker already exists.
    pub async fn close_period(
        &self,
        center_id: Uuid,
        period: BillingPeriod,
        closed_by: Uuid,
    ) -> Result<period_closings::Model, PeriodError> {
        if is_closed_on(&self.db, center_id, period).await? {
            return Err(PeriodError::AlreadyClosed { period });
        }

        #[allow(clippy::cast_possible_wrap)]
        let month = period.month() as i32;

        let marker = period_closings::ActiveModel {
            id: Set(Uuid::new_v4()),
            center_id: Set(center_id),
            year: Set(period.year()),
            month: Set(month),
            closed_by: Set(closed_by),
            closed_at: Set(Utc::now().into()),
        };

        let inserted = marker.insert(&self.db).await?;
        Ok(inserted)
    }

    /// Removes the closing marker, unlocking the period.
    ///
    /// # Errors
    ///
    /// Returns `NotClosed` if no marker exists.
    pub async fn reopen_period(
        &self,
        center_id: Uuid,
        period: BillingPeriod,
    ) -> Result<(), PeriodError> {
        #[allow(clippy::cast_possible_wrap)]
        let month = period.month() as i32;

        let marker = period_closings::Entity::find()
            .filter(period_closings::Column::CenterId.eq(center_id))
            .filter(period_closings::Column::Year.eq(period.year()))
            .filter(period_closings::Column::Month.eq(month))
            .one(&self.db)
            .await?
            .ok_or(PeriodError::NotClosed { period })?;

        period_closings::Entity::delete_by_id(marker.id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

/// Closing-marker existence check, usable on any connection (pool or
/// transaction).
pub(crate) async fn is_closed_on<C: ConnectionTrait>(
    conn: &C,
    center_id: Uuid,
    period: BillingPeriod,
) -> Result<bool, DbErr> {
    #[allow(clippy::cast_possible_wrap)]
    let month = period.month() as i32;

    let marker = period_closings::Entity::find()
        .filter(period_closings::Column::CenterId.eq(center_id))
        .filter(period_closings::Column::Year.eq(period.year()))
        .filter(period_closings::Column::Month.eq(month))
        .one(conn)
        .await?;

    Ok(marker.is_some())
}
