//! `SeaORM` Entity for the payments table.
//!
//! Payment records are immutable after creation except for the soft-delete
//! flag. Original/discount/paid amounts are snapshots taken at computation
//! time; refunds never touch them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning center; nullable for legacy rows, resolved via the group's
    /// course when absent.
    pub center_id: Option<Uuid>,
    pub student_id: Uuid,
    pub group_id: Uuid,
    /// Assigned once, unique within center and period, immutable thereafter.
    #[sea_orm(unique)]
    pub receipt_number: String,
    /// Course price snapshot at computation time.
    pub original_amount: Decimal,
    /// Applied discount snapshot, capped at `original_amount`.
    pub discount_amount: Decimal,
    /// Amount actually charged; `amount <= original_amount - discount_amount`.
    pub amount: Decimal,
    pub method: PaymentMethod,
    /// External transaction reference, if any.
    pub transaction_ref: Option<String>,
    pub description: Option<String>,
    pub status: PaymentStatus,
    pub paid_at: DateTimeWithTimeZone,
    /// The period this payment covers, independent of `created_at`.
    pub billing_month: i32,
    pub billing_year: i32,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Groups,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
