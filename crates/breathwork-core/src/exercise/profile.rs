use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A timed breathing pattern.
///
/// Durations are whole seconds. A missing or zero `hold_secs` means the
/// cycle goes straight from inhale to exhale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub inhale_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_secs: Option<u32>,
    pub exhale_secs: u32,
    pub cycles: u32,
    /// Advertised length shown in listings, not used for timing.
    #[serde(default)]
    pub approx_duration_min: u32,
}

impl ExerciseProfile {
    /// Build a bare profile with no display metadata.
    pub fn new(
        id: impl Into<String>,
        inhale_secs: u32,
        hold_secs: Option<u32>,
        exhale_secs: u32,
        cycles: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            inhale_secs,
            hold_secs,
            exhale_secs,
            cycles,
            approx_duration_min: 0,
        }
    }

    /// Reject profiles the timer cannot run.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidProfile`] if inhale, exhale or cycles is zero.
    pub fn validate(&self) -> Result<()> {
        let problem = if self.inhale_secs == 0 {
            Some("inhale duration must be positive")
        } else if self.exhale_secs == 0 {
            Some("exhale duration must be positive")
        } else if self.cycles == 0 {
            Some("cycle count must be positive")
        } else {
            None
        };

        match problem {
            Some(message) => Err(CoreError::InvalidProfile {
                id: self.id.clone(),
                message: message.into(),
            }),
            None => Ok(()),
        }
    }

    /// Hold duration if the profile has a hold phase at all.
    pub fn effective_hold_secs(&self) -> Option<u32> {
        self.hold_secs.filter(|&s| s > 0)
    }

    /// Seconds in one inhale/hold/exhale cycle.
    pub fn cycle_secs(&self) -> u64 {
        u64::from(self.inhale_secs)
            + u64::from(self.effective_hold_secs().unwrap_or(0))
            + u64::from(self.exhale_secs)
    }

    /// Seconds for the whole exercise.
    pub fn total_secs(&self) -> u64 {
        self.cycle_secs().saturating_mul(u64::from(self.cycles))
    }

    /// Pattern label such as `4-7-8` or `4-8`.
    pub fn pattern(&self) -> String {
        match self.effective_hold_secs() {
            Some(hold) => format!("{}-{}-{}", self.inhale_secs, hold, self.exhale_secs),
            None => format!("{}-{}", self.inhale_secs, self.exhale_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_profile_passes() {
        assert!(ExerciseProfile::new("x", 4, Some(7), 8, 8).validate().is_ok());
        assert!(ExerciseProfile::new("x", 2, None, 2, 1).validate().is_ok());
    }

    #[test]
    fn zero_inhale_is_rejected() {
        let err = ExerciseProfile::new("x", 0, None, 4, 3).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidProfile { .. }));
    }

    #[test]
    fn zero_exhale_is_rejected() {
        let err = ExerciseProfile::new("x", 4, None, 0, 3).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidProfile { .. }));
    }

    #[test]
    fn zero_cycles_is_rejected() {
        let err = ExerciseProfile::new("x", 4, None, 4, 0).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidProfile { .. }));
    }

    #[test]
    fn zero_hold_counts_as_no_hold() {
        let p = ExerciseProfile::new("x", 4, Some(0), 8, 2);
        assert_eq!(p.effective_hold_secs(), None);
        assert_eq!(p.cycle_secs(), 12);
        assert_eq!(p.pattern(), "4-8");
    }

    #[test]
    fn total_secs_for_478() {
        let p = ExerciseProfile::new("478", 4, Some(7), 8, 8);
        assert_eq!(p.cycle_secs(), 19);
        assert_eq!(p.total_secs(), 152);
        assert_eq!(p.pattern(), "4-7-8");
    }
}
