//! Application configuration management.
//!
//! Handles loading, saving, and validating hadir configuration including:
//! - The school site geofence (reference point, valid radius)
//! - Default check-in/check-out time windows
//! - Per-class window overrides
//! - The student-to-class roster
//!
//! Configuration is a TOML file. Class windows take precedence over the
//! site-wide defaults for students enrolled in that class.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clock::TimeWindow;
use crate::error::{HadirError, Result};
use crate::validation::SiteConfig;

/// Default check-in/check-out windows applied when a class has no override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttendanceWindows {
    /// Window during which check-in is accepted.
    pub check_in: TimeWindow,

    /// Window during which check-out is accepted.
    pub check_out: TimeWindow,
}

/// A class and its optional window overrides.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ClassConfig {
    /// Class identifier.
    pub id: u32,

    /// Display name, e.g. "Grade 7A".
    pub name: String,

    /// Check-in window override. Falls back to the site default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<TimeWindow>,

    /// Check-out window override. Falls back to the site default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<TimeWindow>,
}

/// One student-to-class assignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enrollment {
    /// The student.
    pub user_id: u64,

    /// The class they belong to.
    pub class_id: u32,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HadirConfig {
    /// School geofence. Absent until an administrator configures it; all
    /// validation is blocked while it is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteConfig>,

    /// Site-wide default windows.
    pub windows: AttendanceWindows,

    /// Known classes.
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassConfig>,

    /// Student roster.
    #[serde(default, rename = "enrollment")]
    pub enrollments: Vec<Enrollment>,
}

impl Default for HadirConfig {
    fn default() -> Self {
        Self {
            site: None,
            windows: AttendanceWindows {
                check_in: default_window(6, 0, 9, 0),
                check_out: default_window(14, 0, 17, 0),
            },
            classes: Vec::new(),
            enrollments: Vec::new(),
        }
    }
}

fn default_window(sh: u8, sm: u8, eh: u8, em: u8) -> TimeWindow {
    use crate::clock::ClockTime;
    // Constants are in range; construction cannot fail.
    TimeWindow {
        start: ClockTime { hour: sh, minute: sm },
        end: ClockTime { hour: eh, minute: em },
    }
}

impl HadirConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| HadirError::ConfigParseError(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the file cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| HadirError::ConfigParseError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check all invariants the rest of the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidationError` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if let Some(site) = &self.site {
            if !site.reference_point.is_valid() {
                return Err(validation_error(
                    "site.reference_point",
                    "latitude must be in [-90, 90] and longitude in [-180, 180]",
                ));
            }
            if site.valid_radius_meters <= 0.0 {
                return Err(validation_error(
                    "site.valid_radius_meters",
                    "radius must be positive",
                ));
            }
        }

        validate_window("windows.check_in", &self.windows.check_in)?;
        validate_window("windows.check_out", &self.windows.check_out)?;

        for class in &self.classes {
            if let Some(window) = &class.check_in {
                validate_window(&format!("class '{}' check_in", class.name), window)?;
            }
            if let Some(window) = &class.check_out {
                validate_window(&format!("class '{}' check_out", class.name), window)?;
            }
        }

        for enrollment in &self.enrollments {
            if !self.classes.iter().any(|c| c.id == enrollment.class_id) {
                return Err(validation_error(
                    "enrollment",
                    &format!(
                        "user {} is enrolled in unknown class {}",
                        enrollment.user_id, enrollment.class_id
                    ),
                ));
            }
        }

        Ok(())
    }

    /// The site geofence, or `SiteConfigMissing` when not yet configured.
    ///
    /// # Errors
    ///
    /// Returns `SiteConfigMissing` until an administrator has set the site.
    pub fn site(&self) -> Result<&SiteConfig> {
        self.site.as_ref().ok_or(HadirError::SiteConfigMissing)
    }

    /// The class a student belongs to, if any.
    #[must_use]
    pub fn class_for_user(&self, user_id: u64) -> Option<&ClassConfig> {
        let class_id = self
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id)?
            .class_id;
        self.classes.iter().find(|c| c.id == class_id)
    }

    /// Effective check-in window for a class (override or site default).
    #[must_use]
    pub fn check_in_window(&self, class: &ClassConfig) -> TimeWindow {
        class.check_in.unwrap_or(self.windows.check_in)
    }

    /// Effective check-out window for a class (override or site default).
    #[must_use]
    pub fn check_out_window(&self, class: &ClassConfig) -> TimeWindow {
        class.check_out.unwrap_or(self.windows.check_out)
    }
}

fn validate_window(field: &str, window: &TimeWindow) -> Result<()> {
    // An inverted window would silently never match; reject it instead of
    // assuming midnight wraparound.
    if window.is_valid() {
        Ok(())
    } else {
        Err(validation_error(
            field,
            "window end must not precede its start",
        ))
    }
}

fn validation_error(field: &str, message: &str) -> HadirError {
    HadirError::ConfigValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Default configuration file path for the current platform.
///
/// On Linux servers: `/etc/hadir/config.toml`.
/// Elsewhere (development): the platform config dir via `directories`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/etc/hadir/config.toml")
    }
    #[cfg(not(target_os = "linux"))]
    {
        directories::ProjectDirs::from("", "", "hadir")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./hadir-config.toml"))
    }
}
