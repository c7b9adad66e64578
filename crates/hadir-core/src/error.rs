//! Unified error types for the hadir core library.
//!
//! Every rejected operation surfaces as a [`HadirError`] variant with a
//! machine-readable code and a human-readable message. Rejections are
//! expected, recoverable conditions for the caller; none of them triggers a
//! retry inside the engine, and none is a panic. Note that a location being
//! classified `INVALID` is a successful classification, not an error.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::clock::TimeWindow;

/// The unified error type for all hadir operations.
#[derive(Debug, Error)]
pub enum HadirError {
    // =========================================================================
    // ATTENDANCE PRECONDITION ERRORS
    // =========================================================================
    /// The student is not assigned to any class.
    #[error("User {0} is not enrolled in any class. Ask a teacher to add them to one.")]
    NoClassAssigned(u64),

    /// The current time is outside the check-in window.
    #[error("Check-in is only allowed between {window}")]
    OutsideCheckInWindow {
        /// The effective check-in window.
        window: TimeWindow,
    },

    /// The current time is outside the check-out window.
    #[error("Check-out is only allowed between {window}")]
    OutsideCheckOutWindow {
        /// The effective check-out window.
        window: TimeWindow,
    },

    /// A check-in was already recorded for this user today.
    #[error("Already checked in today")]
    AlreadyCheckedIn,

    /// A check-out was already recorded for this user today.
    #[error("Already checked out today")]
    AlreadyCheckedOut,

    /// The attendance record targeted by a teacher override does not exist.
    #[error("Attendance record not found: {0}")]
    RecordNotFound(Uuid),

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The school site (reference point, radius) has not been configured.
    /// Blocks all location validation.
    #[error("School site is not configured. Set the reference point and radius first.")]
    SiteConfigMissing,

    /// The configuration file was not found at the expected path.
    #[error("Configuration file not found at: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {field}: {message}")]
    ConfigValidationError {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    // =========================================================================
    // PERSISTENCE & I/O ERRORS
    // =========================================================================
    /// An error occurred while persisting or reading attendance data.
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A specialized [`Result`] type for hadir operations.
pub type Result<T> = std::result::Result<T, HadirError>;

impl HadirError {
    /// Returns `true` if this error is a violated attendance precondition.
    ///
    /// Precondition failures are expected operational states: the caller may
    /// simply try again later (e.g. once the window opens) or not at all.
    #[inline]
    #[must_use]
    pub const fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            Self::NoClassAssigned(_)
                | Self::OutsideCheckInWindow { .. }
                | Self::OutsideCheckOutWindow { .. }
                | Self::AlreadyCheckedIn
                | Self::AlreadyCheckedOut
                | Self::RecordNotFound(_)
        )
    }

    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::SiteConfigMissing
                | Self::ConfigNotFound(_)
                | Self::ConfigParseError(_)
                | Self::ConfigValidationError { .. }
        )
    }

    /// Returns `true` if this error is related to I/O or persistence.
    #[inline]
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::PersistenceError(_) | Self::IoError(_))
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - precondition not met
            Self::NoClassAssigned(_)
            | Self::OutsideCheckInWindow { .. }
            | Self::OutsideCheckOutWindow { .. } => 400,

            // 404 Not Found
            Self::RecordNotFound(_) | Self::ConfigNotFound(_) => 404,

            // 409 Conflict - the day already has this side recorded
            Self::AlreadyCheckedIn | Self::AlreadyCheckedOut => 409,

            // 422 Unprocessable Entity - semantic config errors
            Self::ConfigParseError(_) | Self::ConfigValidationError { .. } => 422,

            // 424 Failed Dependency - site must be configured first
            Self::SiteConfigMissing => 424,

            // 500 Internal Server Error
            Self::PersistenceError(_) | Self::IoError(_) => 500,
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoClassAssigned(_) => "NO_CLASS_ASSIGNED",
            Self::OutsideCheckInWindow { .. } => "OUTSIDE_CHECKIN_WINDOW",
            Self::OutsideCheckOutWindow { .. } => "OUTSIDE_CHECKOUT_WINDOW",
            Self::AlreadyCheckedIn => "ALREADY_CHECKED_IN",
            Self::AlreadyCheckedOut => "ALREADY_CHECKED_OUT",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::SiteConfigMissing => "SITE_CONFIG_MISSING",
            Self::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            Self::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            Self::ConfigValidationError { .. } => "CONFIG_VALIDATION_ERROR",
            Self::PersistenceError(_) => "PERSISTENCE_ERROR",
            Self::IoError(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use std::io::{Error as IoErr, ErrorKind};

    fn window() -> TimeWindow {
        TimeWindow::new(
            ClockTime::new(7, 0).unwrap(),
            ClockTime::new(9, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_precondition_classification() {
        assert!(HadirError::NoClassAssigned(1).is_precondition_failure());
        assert!(HadirError::OutsideCheckInWindow { window: window() }.is_precondition_failure());
        assert!(HadirError::AlreadyCheckedIn.is_precondition_failure());
        assert!(HadirError::AlreadyCheckedOut.is_precondition_failure());
        assert!(HadirError::RecordNotFound(Uuid::nil()).is_precondition_failure());

        assert!(!HadirError::SiteConfigMissing.is_precondition_failure());
        assert!(!HadirError::PersistenceError("x".into()).is_precondition_failure());
    }

    #[test]
    fn test_config_error_classification() {
        assert!(HadirError::SiteConfigMissing.is_config_error());
        assert!(HadirError::ConfigNotFound(PathBuf::from("/test")).is_config_error());
        assert!(HadirError::ConfigParseError("syntax error".into()).is_config_error());
        assert!(!HadirError::AlreadyCheckedIn.is_config_error());
    }

    #[test]
    fn test_io_error_classification() {
        assert!(HadirError::PersistenceError("disk full".into()).is_io_error());
        assert!(HadirError::IoError(IoErr::new(ErrorKind::NotFound, "test")).is_io_error());
        assert!(!HadirError::AlreadyCheckedIn.is_io_error());
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(HadirError::NoClassAssigned(1).http_status_code(), 400);
        assert_eq!(
            HadirError::OutsideCheckInWindow { window: window() }.http_status_code(),
            400
        );
        assert_eq!(HadirError::AlreadyCheckedIn.http_status_code(), 409);
        assert_eq!(HadirError::AlreadyCheckedOut.http_status_code(), 409);
        assert_eq!(
            HadirError::RecordNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(HadirError::SiteConfigMissing.http_status_code(), 424);
        assert_eq!(
            HadirError::PersistenceError("error".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            HadirError::AlreadyCheckedIn.error_code(),
            "ALREADY_CHECKED_IN"
        );
        assert_eq!(
            HadirError::SiteConfigMissing.error_code(),
            "SITE_CONFIG_MISSING"
        );
        assert_eq!(
            HadirError::RecordNotFound(Uuid::nil()).error_code(),
            "RECORD_NOT_FOUND"
        );
    }

    #[test]
    fn test_error_display_messages() {
        let err = HadirError::OutsideCheckInWindow { window: window() };
        assert!(err.to_string().contains("07:00 - 09:00"));

        let err = HadirError::NoClassAssigned(42);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<HadirError>();
        assert_sync::<HadirError>();
    }
}
