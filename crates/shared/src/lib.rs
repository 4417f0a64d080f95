//! Shared types, errors, and configuration for Centra.
//!
//! This crate provides common infrastructure used across all other crates:
//! - Application-wide error types with transport status mapping
//! - Configuration management
//! - JWT claims and token handling for caller/tenant resolution

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
