//! Check-in/check-out session control and teacher override.
//!
//! Orchestrates the geofence classifier, the time-window gate, and the
//! reconciler against the persisted daily record. Each operation is an
//! independent request-scoped call: it either completes with a definitive
//! result or fails fast with a typed rejection. Nothing here retries, and no
//! raw coordinates are ever written.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::attendance::{reconcile, AttendanceRecord, AttendanceStatus};
use crate::clock::{wita_date_string, Clock, ClockTime, SystemClock, TimeWindow};
use crate::config::HadirConfig;
use crate::error::{HadirError, Result};
use crate::storage::Storage;
use crate::validation::{classify, LocationSample, ValidationResult};

/// Result of a successful check-in or check-out attempt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckOutcome {
    /// Geofence classification of the submitted sample.
    pub validation: ValidationResult,

    /// The daily record after this attempt was applied.
    pub record: AttendanceRecord,
}

/// Manager for attendance sessions.
///
/// Stateless between calls apart from the persisted records; two managers
/// over the same storage behave identically.
pub struct AttendanceManager {
    storage: Arc<Storage>,
    clock: Box<dyn Clock>,
}

impl AttendanceManager {
    /// Create a manager using the system clock.
    #[must_use]
    pub fn new(storage: Arc<Storage>) -> Self {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    /// Create a manager with an explicit clock (used by tests).
    #[must_use]
    pub fn with_clock(storage: Arc<Storage>, clock: Box<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Today's date key in WITA.
    #[must_use]
    pub fn current_date(&self) -> String {
        wita_date_string(self.clock.as_ref())
    }

    /// A student's record for today, if any.
    ///
    /// # Errors
    ///
    /// Returns an error only when storage fails.
    pub fn today(&self, user_id: u64) -> Result<Option<AttendanceRecord>> {
        self.storage.find(user_id, &self.current_date())
    }

    /// Attempt a check-in for `user_id` with the given location sample.
    ///
    /// # Errors
    ///
    /// Rejects with `NoClassAssigned`, `SiteConfigMissing`,
    /// `OutsideCheckInWindow`, or `AlreadyCheckedIn`; storage failures
    /// propagate as persistence errors.
    pub fn attempt_check_in(
        &self,
        config: &HadirConfig,
        user_id: u64,
        sample: &LocationSample,
    ) -> Result<CheckOutcome> {
        let site = config.site()?;
        let class = config
            .class_for_user(user_id)
            .ok_or(HadirError::NoClassAssigned(user_id))?;

        let window = config.check_in_window(class);
        self.require_within(window, true)?;

        let validation = classify(sample, site);
        let now = self.clock.now_utc();
        let date = self.current_date();
        let status = validation.status;

        let record = self.storage.update_day(user_id, &date, |existing| {
            let mut record =
                existing.unwrap_or_else(|| AttendanceRecord::new(user_id, date.clone()));
            if record.check_in_time.is_some() {
                return Err(HadirError::AlreadyCheckedIn);
            }
            record.check_in_time = Some(now);
            record.check_in_status = Some(status);
            record.final_status = reconcile(Some(status), record.check_out_status);
            Ok(record)
        })?;

        tracing::info!(
            user_id,
            date = %record.date,
            status = ?status,
            distance_m = validation.distance_meters,
            "check-in recorded"
        );

        Ok(CheckOutcome { validation, record })
    }

    /// Attempt a check-out for `user_id` with the given location sample.
    ///
    /// Check-out may precede check-in (present for pickup without a morning
    /// record); in that case the record is created with the final status
    /// forced to `NEEDS_VERIFICATION` regardless of the sample's
    /// classification, because a departure without a recorded arrival always
    /// needs a teacher's decision.
    ///
    /// # Errors
    ///
    /// Rejects with `NoClassAssigned`, `SiteConfigMissing`,
    /// `OutsideCheckOutWindow`, or `AlreadyCheckedOut`; storage failures
    /// propagate as persistence errors.
    pub fn attempt_check_out(
        &self,
        config: &HadirConfig,
        user_id: u64,
        sample: &LocationSample,
    ) -> Result<CheckOutcome> {
        let site = config.site()?;
        let class = config
            .class_for_user(user_id)
            .ok_or(HadirError::NoClassAssigned(user_id))?;

        let window = config.check_out_window(class);
        self.require_within(window, false)?;

        let validation = classify(sample, site);
        let now = self.clock.now_utc();
        let date = self.current_date();
        let status = validation.status;

        let record = self.storage.update_day(user_id, &date, |existing| {
            match existing {
                Some(mut record) => {
                    if record.check_out_time.is_some() {
                        return Err(HadirError::AlreadyCheckedOut);
                    }
                    record.check_out_time = Some(now);
                    record.check_out_status = Some(status);
                    record.final_status = reconcile(record.check_in_status, Some(status));
                    Ok(record)
                }
                None => {
                    let mut record = AttendanceRecord::new(user_id, date.clone());
                    record.check_out_time = Some(now);
                    record.check_out_status = Some(status);
                    record.final_status = AttendanceStatus::NeedsVerification;
                    Ok(record)
                }
            }
        })?;

        tracing::info!(
            user_id,
            date = %record.date,
            status = ?status,
            distance_m = validation.distance_meters,
            "check-out recorded"
        );

        Ok(CheckOutcome { validation, record })
    }

    /// Teacher override: unconditionally set the final status.
    ///
    /// A privileged transition usable from any state, bypassing the
    /// reconciler. Repeated application simply overwrites the previous
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` when no record has `attendance_id`.
    pub fn teacher_override(
        &self,
        attendance_id: Uuid,
        new_status: AttendanceStatus,
        note: Option<String>,
        teacher_id: u64,
    ) -> Result<AttendanceRecord> {
        let mut record = self
            .storage
            .find_by_id(attendance_id)?
            .ok_or(HadirError::RecordNotFound(attendance_id))?;

        record.final_status = new_status;
        record.teacher_note = note;
        record.teacher_validated = true;
        record.validated_by = Some(teacher_id);
        record.validated_at = Some(self.clock.now_utc());

        self.storage.upsert(&record)?;

        tracing::info!(
            attendance_id = %attendance_id,
            teacher_id,
            status = ?new_status,
            "teacher override applied"
        );

        Ok(record)
    }

    fn require_within(&self, window: TimeWindow, check_in: bool) -> Result<()> {
        let now_local = ClockTime::from_instant(self.clock.now_wita());
        if window.contains(now_local) {
            Ok(())
        } else if check_in {
            Err(HadirError::OutsideCheckInWindow { window })
        } else {
            Err(HadirError::OutsideCheckOutWindow { window })
        }
    }
}
