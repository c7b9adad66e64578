//! Daily attendance records and the final-status reconciler.
//!
//! One record exists per (user, WITA calendar date). The check-in and
//! check-out sides are filled in independently, at most once each, and the
//! pair of per-side validation statuses is reduced to a single daily verdict
//! by [`reconcile`]. Teachers may overwrite that verdict at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::ValidationStatus;

/// Overall attendance verdict for one user-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// Valid check-in and valid check-out.
    FullPresent,
    /// Valid check-in; check-out missing or imperfect.
    PartialPresent,
    /// No valid check-in; a teacher must decide.
    NeedsVerification,
}

/// One user-day attendance record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    /// Record identifier.
    pub id: Uuid,

    /// The student this record belongs to.
    #[schema(example = 17)]
    pub user_id: u64,

    /// WITA calendar date, `YYYY-MM-DD`. Natural key together with `user_id`.
    #[schema(example = "2025-03-02")]
    pub date: String,

    /// When the student checked in (UTC), if they have.
    pub check_in_time: Option<DateTime<Utc>>,

    /// Classification of the check-in sample.
    pub check_in_status: Option<ValidationStatus>,

    /// When the student checked out (UTC), if they have.
    pub check_out_time: Option<DateTime<Utc>>,

    /// Classification of the check-out sample.
    pub check_out_status: Option<ValidationStatus>,

    /// The daily verdict, automatic or teacher-set.
    pub final_status: AttendanceStatus,

    /// Whether a teacher has manually validated this record.
    pub teacher_validated: bool,

    /// Optional note left by the validating teacher.
    pub teacher_note: Option<String>,

    /// Teacher who validated the record.
    pub validated_by: Option<u64>,

    /// When the teacher validation happened (UTC).
    pub validated_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// A fresh record with neither side filled in.
    #[must_use]
    pub fn new(user_id: u64, date: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            check_in_time: None,
            check_in_status: None,
            check_out_time: None,
            check_out_status: None,
            final_status: AttendanceStatus::NeedsVerification,
            teacher_validated: false,
            teacher_note: None,
            validated_by: None,
            validated_at: None,
        }
    }
}

/// Reduce the two per-side statuses to the daily verdict.
///
/// The rule is check-in-centric: arrival establishes the baseline presence
/// claim. A valid arrival with any non-perfect departure is still "partial",
/// while any non-valid arrival escalates to teacher review even when the
/// departure reading was perfect.
#[must_use]
pub fn reconcile(
    check_in: Option<ValidationStatus>,
    check_out: Option<ValidationStatus>,
) -> AttendanceStatus {
    match (check_in, check_out) {
        (Some(ValidationStatus::Valid), Some(ValidationStatus::Valid)) => {
            AttendanceStatus::FullPresent
        }
        (Some(ValidationStatus::Valid), _) => AttendanceStatus::PartialPresent,
        _ => AttendanceStatus::NeedsVerification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValidationStatus::{Invalid, LowAccuracy, Valid};

    #[test]
    fn test_both_valid_is_full_present() {
        assert_eq!(
            reconcile(Some(Valid), Some(Valid)),
            AttendanceStatus::FullPresent
        );
    }

    #[test]
    fn test_valid_check_in_alone_is_partial() {
        assert_eq!(reconcile(Some(Valid), None), AttendanceStatus::PartialPresent);
        assert_eq!(
            reconcile(Some(Valid), Some(LowAccuracy)),
            AttendanceStatus::PartialPresent
        );
        assert_eq!(
            reconcile(Some(Valid), Some(Invalid)),
            AttendanceStatus::PartialPresent
        );
    }

    #[test]
    fn test_non_valid_check_in_always_needs_verification() {
        // Even a perfect check-out cannot rescue a missing or bad arrival.
        for check_in in [None, Some(LowAccuracy), Some(Invalid)] {
            for check_out in [None, Some(Valid), Some(LowAccuracy), Some(Invalid)] {
                assert_eq!(
                    reconcile(check_in, check_out),
                    AttendanceStatus::NeedsVerification,
                    "check_in={check_in:?} check_out={check_out:?}"
                );
            }
        }
    }

    #[test]
    fn test_reconciler_totality_over_status_grid() {
        // Every combination maps to exactly one of the three verdicts.
        let sides = [None, Some(Valid), Some(LowAccuracy), Some(Invalid)];
        for check_in in sides {
            for check_out in sides {
                let verdict = reconcile(check_in, check_out);
                assert!(matches!(
                    verdict,
                    AttendanceStatus::FullPresent
                        | AttendanceStatus::PartialPresent
                        | AttendanceStatus::NeedsVerification
                ));
            }
        }
    }

    #[test]
    fn test_new_record_is_empty_and_unverified() {
        let record = AttendanceRecord::new(7, "2025-03-02".to_string());
        assert_eq!(record.user_id, 7);
        assert!(record.check_in_time.is_none());
        assert!(record.check_out_time.is_none());
        assert!(!record.teacher_validated);
        assert_eq!(record.final_status, AttendanceStatus::NeedsVerification);
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::FullPresent).unwrap(),
            "\"FULL_PRESENT\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::NeedsVerification).unwrap(),
            "\"NEEDS_VERIFICATION\""
        );
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let mut record = AttendanceRecord::new(7, "2025-03-02".to_string());
        record.check_in_status = Some(Valid);
        record.final_status = AttendanceStatus::PartialPresent;

        let json = serde_json::to_string(&record).unwrap();
        let back: AttendanceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.check_in_status, Some(Valid));
        assert_eq!(back.final_status, AttendanceStatus::PartialPresent);
    }
}
