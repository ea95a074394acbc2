//! # HTTP Request Handlers
//!
//! This module contains all HTTP request handlers of the application.
//! Each handler validates its input, issues one store or collaborator call
//! and answers with the `{ status, ... }` envelope.
//!
//! ## Available Handlers
//!
//! - **Account** (`account`) - Profile and settings of the signed-in user
//! - **Appointments** (`appointments`) - Booking and upcoming reminders
//! - **Authentication** (`auth`) - Registration, login, session check, logout
//! - **Booking** (`booking`) - Services, slots, bookings, cart and feedback
//! - **Content** (`content`) - Pages, home page, search and blog
//! - **Fitness** (`fitness`) - Nutrition plan and fitness activity log
//! - **Guardian** (`guardian`) - Consent-gated guardian access
//! - **Health Check** (`health_check`) - Application health monitoring
//! - **Health Metrics** (`health_metrics`) - Per-user metrics with upsert
//! - **Mental Health** (`mental_health`) - Resources, self-assessment, sessions
//! - **Programs** (`programs`) - Health programs and payments
//! - **Symptoms** (`symptoms`) - Symptom checker

mod account;
mod appointments;
mod auth;
mod booking;
mod content;
mod fitness;
mod guardian;
mod health_check;
mod health_metrics;
mod mental_health;
mod programs;
mod symptoms;

pub use account::*;
pub use appointments::*;
pub use auth::*;
pub use booking::*;
pub use content::*;
pub use fitness::*;
pub use guardian::*;
pub use health_check::*;
pub use health_metrics::*;
pub use mental_health::*;
pub use programs::*;
pub use symptoms::*;
