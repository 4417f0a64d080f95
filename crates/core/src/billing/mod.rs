//! Billing domain logic.
//!
//! The computation engine behind payments and discounts: payable previews,
//! charge and refund validation, billing period arithmetic, and tenant
//! scoping. Everything here is pure; persistence lives in `centra-db`.

pub mod charge;
pub mod error;
pub mod period;
pub mod preview;
pub mod scope;

pub use charge::{resolve_charge, validate_batch_request, validate_refund};
pub use error::BillingError;
pub use period::BillingPeriod;
pub use preview::PaymentPreview;
pub use scope::TenantScope;
