//! Persistent storage for attendance records.
//!
//! Uses one JSON file per WITA calendar day, holding at most one record per
//! student. A storage-level mutex serializes every read-modify-write, which
//! is what makes the "at most one check-in and one check-out per user per
//! day" guarantee hold under concurrent duplicate requests: the duplicate
//! check and the write happen under the same lock.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use uuid::Uuid;

use crate::attendance::AttendanceRecord;
use crate::error::{HadirError, Result};

/// Storage backend for attendance data.
#[derive(Debug)]
pub struct Storage {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl Storage {
    /// Create a new storage instance rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            lock: Mutex::new(()),
        }
    }

    /// Get the default storage location.
    ///
    /// On Linux servers: `/var/lib/hadir/`.
    /// Elsewhere (development): the platform data dir via `directories`.
    ///
    /// # Errors
    ///
    /// Returns an error when no data directory can be determined.
    pub fn default_location() -> Result<Self> {
        #[cfg(target_os = "linux")]
        {
            Ok(Self::new(PathBuf::from("/var/lib/hadir")))
        }
        #[cfg(not(target_os = "linux"))]
        {
            let dirs = directories::ProjectDirs::from("", "", "hadir").ok_or_else(|| {
                HadirError::PersistenceError("Cannot determine data directory".into())
            })?;
            Ok(Self::new(dirs.data_dir().to_path_buf()))
        }
    }

    /// Find a student's record for a given date.
    ///
    /// # Errors
    ///
    /// Returns an error when the day file exists but cannot be read.
    pub fn find(&self, user_id: u64, date: &str) -> Result<Option<AttendanceRecord>> {
        let _guard = self.guard()?;
        Ok(self.load_day(date)?.remove(&user_id))
    }

    /// Find a record by its id.
    ///
    /// The id alone does not name a day file, so this scans them all.
    /// Teacher overrides are rare enough that a scan is fine at this scale.
    ///
    /// # Errors
    ///
    /// Returns an error when a day file cannot be read.
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<AttendanceRecord>> {
        let _guard = self.guard()?;
        let dir = self.attendance_dir();
        if !dir.exists() {
            return Ok(None);
        }
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let day = Self::read_day_file(&path)?;
            if let Some(record) = day.into_values().find(|r| r.id == id) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Insert or replace a record, keyed by `(user_id, date)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the day file cannot be read or written.
    pub fn upsert(&self, record: &AttendanceRecord) -> Result<()> {
        let _guard = self.guard()?;
        let mut day = self.load_day(&record.date)?;
        day.insert(record.user_id, record.clone());
        self.save_day(&record.date, &day)
    }

    /// Atomically apply `mutate` to a student's record for `date`.
    ///
    /// The closure sees the current record (or `None`) and returns the
    /// record to persist; its error short-circuits without writing. The
    /// whole load-mutate-save cycle runs under the storage lock.
    ///
    /// # Errors
    ///
    /// Propagates the closure's error, or any read/write failure.
    pub fn update_day<F>(&self, user_id: u64, date: &str, mutate: F) -> Result<AttendanceRecord>
    where
        F: FnOnce(Option<AttendanceRecord>) -> Result<AttendanceRecord>,
    {
        let _guard = self.guard()?;
        let mut day = self.load_day(date)?;
        let record = mutate(day.remove(&user_id))?;
        day.insert(user_id, record.clone());
        self.save_day(date, &day)?;
        Ok(record)
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| HadirError::PersistenceError("storage lock poisoned".into()))
    }

    fn load_day(&self, date: &str) -> Result<BTreeMap<u64, AttendanceRecord>> {
        let path = self.day_path(date);
        if path.exists() {
            Self::read_day_file(&path)
        } else {
            Ok(BTreeMap::new())
        }
    }

    fn read_day_file(path: &std::path::Path) -> Result<BTreeMap<u64, AttendanceRecord>> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            HadirError::PersistenceError(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    fn save_day(&self, date: &str, day: &BTreeMap<u64, AttendanceRecord>) -> Result<()> {
        let path = self.day_path(date);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(day)
            .map_err(|e| HadirError::PersistenceError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn attendance_dir(&self) -> PathBuf {
        self.data_dir.join("attendance")
    }

    fn day_path(&self, date: &str) -> PathBuf {
        self.attendance_dir().join(format!("{date}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::AttendanceStatus;

    fn storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());
        (dir, storage)
    }

    #[test]
    fn test_find_on_empty_storage_is_none() {
        let (_dir, storage) = storage();
        assert!(storage.find(17, "2025-03-02").unwrap().is_none());
    }

    #[test]
    fn test_upsert_then_find() {
        let (_dir, storage) = storage();
        let record = AttendanceRecord::new(17, "2025-03-02".to_string());
        storage.upsert(&record).unwrap();

        let found = storage.find(17, "2025-03-02").unwrap().expect("stored");
        assert_eq!(found.id, record.id);
        assert_eq!(found.final_status, AttendanceStatus::NeedsVerification);

        // A different user or day stays empty.
        assert!(storage.find(18, "2025-03-02").unwrap().is_none());
        assert!(storage.find(17, "2025-03-03").unwrap().is_none());
    }

    #[test]
    fn test_find_by_id_scans_days() {
        let (_dir, storage) = storage();
        let monday = AttendanceRecord::new(17, "2025-03-03".to_string());
        let tuesday = AttendanceRecord::new(17, "2025-03-04".to_string());
        storage.upsert(&monday).unwrap();
        storage.upsert(&tuesday).unwrap();

        let found = storage.find_by_id(tuesday.id).unwrap().expect("found");
        assert_eq!(found.date, "2025-03-04");
        assert!(storage.find_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_update_day_applies_mutation() {
        let (_dir, storage) = storage();
        let updated = storage
            .update_day(17, "2025-03-02", |existing| {
                assert!(existing.is_none());
                let mut record = AttendanceRecord::new(17, "2025-03-02".to_string());
                record.teacher_note = Some("first".to_string());
                Ok(record)
            })
            .unwrap();
        assert_eq!(updated.teacher_note.as_deref(), Some("first"));

        storage
            .update_day(17, "2025-03-02", |existing| {
                let mut record = existing.expect("created above");
                record.teacher_note = Some("second".to_string());
                Ok(record)
            })
            .unwrap();

        let found = storage.find(17, "2025-03-02").unwrap().unwrap();
        assert_eq!(found.teacher_note.as_deref(), Some("second"));
    }

    #[test]
    fn test_update_day_error_does_not_write() {
        let (_dir, storage) = storage();
        let result = storage.update_day(17, "2025-03-02", |_| {
            Err(HadirError::AlreadyCheckedIn)
        });
        assert!(matches!(result, Err(HadirError::AlreadyCheckedIn)));
        assert!(storage.find(17, "2025-03-02").unwrap().is_none());
    }

    #[test]
    fn test_day_files_keep_users_separate() {
        let (_dir, storage) = storage();
        storage
            .upsert(&AttendanceRecord::new(1, "2025-03-02".to_string()))
            .unwrap();
        storage
            .upsert(&AttendanceRecord::new(2, "2025-03-02".to_string()))
            .unwrap();

        assert!(storage.find(1, "2025-03-02").unwrap().is_some());
        assert!(storage.find(2, "2025-03-02").unwrap().is_some());
    }
}
