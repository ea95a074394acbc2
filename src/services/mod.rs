//! # Business Logic Services
//!
//! This module contains the business logic services of the application.
//! Services encapsulate domain-specific functionality and provide clean interfaces
//! for use by HTTP handlers.
//!
//! ## Available Services
//!
//! - **Account** (`account`) - Registration, credential checks and settings
//! - **JWT** (`jwt`) - Session token creation and validation
//! - **Payment** (`payment`) - Payment processor with multiple implementations
//! - **Symptom** (`symptom`) - Fixed symptom to advice lookup

pub mod account;
pub mod jwt;
pub mod payment;
pub mod symptom;
