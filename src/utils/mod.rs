//! # Utility Modules
//!
//! This module contains utility functions, constants, and validators used
//! throughout the application.
//!
//! ## Available Utilities
//!
//! - **Constants** (`constant`) - Application-wide configuration constants
//! - **Extractors** (`extract`) - JSON body and query extractors with enveloped rejections
//! - **Payload** (`payload`) - Client JSON to store record conversion
//! - **Response** (`response`) - The `{ status, ... }` response envelope
//! - **Validators** (`validator`) - Input validation utilities and regex patterns

pub mod constant;
pub mod extract;
pub mod payload;
pub mod response;
pub mod validator;
