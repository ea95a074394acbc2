//! # Middleware Components
//!
//! This module contains middleware functions that handle cross-cutting concerns
//! such as authentication.

pub mod auth;

pub use auth::{AuthUser, auth_middleware};
