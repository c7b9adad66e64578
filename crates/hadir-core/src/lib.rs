//! # hadir-core
//!
//! Core business logic for hadir, a geofenced student attendance system.
//!
//! This crate provides:
//! - Haversine distance against the school's geofence
//! - GPS-accuracy-aware validation of check-in/check-out samples
//! - Fixed UTC+8 (WITA) time-window gating with an injectable clock
//! - The per-day attendance record and its final-status reconciler
//! - Teacher override of the automatic verdict
//! - TOML configuration and JSON day-file persistence
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`geo`] - Great-circle distance between coordinates
//! - [`clock`] - WITA fixed-offset clock and time windows
//! - [`validation`] - Geofence + accuracy classification
//! - [`attendance`] - Daily records and the final-status reconciler
//! - [`session`] - Check-in/check-out orchestration and teacher override
//! - [`config`] - Site, window, class, and roster configuration
//! - [`storage`] - Persistent storage for attendance records
//! - [`error`] - Unified error types for the crate
//!
//! Location samples are consumed at classification time and never persisted;
//! only the validation status and rounded distance survive a request.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod attendance;
pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod session;
pub mod storage;
pub mod validation;

// Re-export primary types for convenience
pub use attendance::{reconcile, AttendanceRecord, AttendanceStatus};
pub use clock::{wita, wita_date_string, Clock, ClockTime, FixedClock, SystemClock, TimeWindow};
pub use config::{default_config_path, AttendanceWindows, ClassConfig, Enrollment, HadirConfig};
pub use error::{HadirError, Result};
pub use geo::{distance_meters, GeoPoint};
pub use session::{AttendanceManager, CheckOutcome};
pub use storage::Storage;
pub use validation::{classify, LocationSample, SiteConfig, ValidationResult, ValidationStatus};
