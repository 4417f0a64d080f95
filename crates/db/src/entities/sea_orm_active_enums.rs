//! Database enum types mapped to `PostgreSQL` enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a payment was made.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the front desk.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Card terminal.
    #[sea_orm(string_value = "card")]
    Card,
    /// Bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Recorded status of a payment.
///
/// This reflects what the operator recorded; there is no reconciliation with
/// an external processor.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting settlement.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Funds received.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Collection failed.
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// Expense category; refunds are recorded as expenses of category `refund`.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_category")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Ordinary operating expense.
    #[sea_orm(string_value = "general")]
    General,
    /// Reversing entry for a prior payment.
    #[sea_orm(string_value = "refund")]
    Refund,
}
