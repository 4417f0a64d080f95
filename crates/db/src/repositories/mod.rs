//! Repository abstractions for data access.

pub mod discount;
pub mod payment;
pub mod period;
pub mod receipt;
pub mod refund;

pub use discount::DiscountRepository;
pub use payment::PaymentRepository;
pub use period::PeriodRepository;
pub use refund::RefundRepository;
