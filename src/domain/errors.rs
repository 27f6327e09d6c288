//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Every variant except `Database`/`Internal` is an expected outcome that is
//! surfaced to the caller with a stable machine-readable code.

use sea_orm::{DbErr, SqlErr};

/// How a failure should be classified by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    BadRequest,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Wellness pass not found")]
    PassNotFound,

    #[error("Wellness pass already completed")]
    PassAlreadyCompleted,

    #[error("Another wellness pass is already active")]
    PassAlreadyActive,

    #[error("No active wellness pass")]
    PassNotActive,

    #[error("Not enrolled in this wellness pass")]
    NotEnrolled,

    #[error("Wellness pass already finished")]
    AlreadyFinished,

    #[error("Day {requested} is not the current day (expected {expected})")]
    WrongDay { requested: i32, expected: i32 },

    #[error("Day {day} is still locked")]
    DayLocked { day: i32 },

    #[error("Day {day} not found")]
    DayNotFound { day: i32 },

    #[error("Coupon not found")]
    CouponNotFound,

    #[error("Coupon has expired")]
    CouponExpired,

    #[error("Coupon has no remaining uses")]
    CouponExhausted,

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable code exposed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::PassNotFound => "PASS_NOT_FOUND",
            DomainError::PassAlreadyCompleted => "PASS_ALREADY_COMPLETED",
            DomainError::PassAlreadyActive => "PASS_ALREADY_ACTIVE",
            DomainError::PassNotActive => "PASS_NOT_ACTIVE",
            DomainError::NotEnrolled => "NOT_ENROLLED",
            DomainError::AlreadyFinished => "ALREADY_FINISHED",
            DomainError::WrongDay { .. } => "WRONG_DAY",
            DomainError::DayLocked { .. } => "DAY_LOCKED",
            DomainError::DayNotFound { .. } => "DAY_NOT_FOUND",
            DomainError::CouponNotFound => "COUPON_NOT_FOUND",
            DomainError::CouponExpired => "COUPON_EXPIRED",
            DomainError::CouponExhausted => "COUPON_EXHAUSTED",
            DomainError::InvalidRequest(_) => "INVALID_REQUEST",
            DomainError::Database(_) | DomainError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::PassNotFound
            | DomainError::DayNotFound { .. }
            | DomainError::NotEnrolled
            | DomainError::PassNotActive
            | DomainError::CouponNotFound => ErrorKind::NotFound,
            DomainError::PassAlreadyCompleted
            | DomainError::PassAlreadyActive
            | DomainError::AlreadyFinished
            | DomainError::DayLocked { .. }
            | DomainError::CouponExpired
            | DomainError::CouponExhausted => ErrorKind::Conflict,
            DomainError::WrongDay { .. } | DomainError::InvalidRequest(_) => ErrorKind::BadRequest,
            DomainError::Database(_) | DomainError::Internal(_) => ErrorKind::Internal,
        }
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// True when the storage layer rejected a write because of a unique constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
