//! `SeaORM` Entity for the period closings table.
//!
//! The presence of a row for (center, year, month) marks the accounting
//! period as locked against new financial mutations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "period_closings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub center_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub closed_by: Uuid,
    pub closed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::centers::Entity",
        from = "Column::CenterId",
        to = "super::centers::Column::Id"
    )]
    Centers,
}

impl Related<super::centers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Centers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
