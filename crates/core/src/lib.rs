//! Core billing logic for Centra.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `billing` - Payable previews, charge/refund validation, billing periods,
//!   tenant scoping
//! - `receipt` - Human-readable receipt number formatting

pub mod billing;
pub mod receipt;
