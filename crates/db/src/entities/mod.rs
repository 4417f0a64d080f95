//! `SeaORM` entity definitions for the billing schema.

pub mod centers;
pub mod courses;
pub mod discounts;
pub mod enrollments;
pub mod expenses;
pub mod groups;
pub mod payments;
pub mod period_closings;
pub mod sea_orm_active_enums;
