//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Every time-dependent operation takes `now` explicitly so the unlock gate
//! can be driven by the caller.

pub mod catalog_service;
pub mod completion_service;
pub mod coupon_service;
pub mod enrollment_service;
pub mod migration_service;
pub mod progress_view;
pub mod reservation;
pub mod reward_service;
pub mod user_state;

// Re-export for convenience
pub use catalog_service::{CatalogEntry, PassState, get_catalog};
pub use completion_service::{CompletionOutcome, Recorded, complete_day};
pub use coupon_service::{RedeemedCoupon, redeem_coupon};
pub use enrollment_service::{StartedPass, start_pass};
pub use migration_service::ensure_active_slot;
pub use progress_view::{ActiveProgramView, DayOverview, get_active};
