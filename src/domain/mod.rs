//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no Axum, no I/O).
//! Only domain error types and the time-gating rules of a wellness pass.

pub mod availability;
pub mod errors;

pub use availability::{
    Availability, DayStatus, EnrollmentProgress, compute_availability, day_status,
};
pub use errors::{DomainError, ErrorKind, is_unique_violation};
