use serde::{Deserialize, Serialize};

use super::profile::ExerciseProfile;
use crate::error::{CoreError, Result};

/// Ordered, immutable list of exercises offered to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalogue {
    exercises: Vec<ExerciseProfile>,
}

impl Catalogue {
    /// The four exercises shipped with the app.
    pub fn builtin() -> Self {
        Self {
            exercises: vec![
                ExerciseProfile {
                    id: "478".into(),
                    name: "4-7-8".into(),
                    description: "Calm down and fall asleep".into(),
                    inhale_secs: 4,
                    hold_secs: Some(7),
                    exhale_secs: 8,
                    cycles: 8,
                    approx_duration_min: 5,
                },
                ExerciseProfile {
                    id: "box".into(),
                    name: "Box breathing".into(),
                    description: "Concentration and focus".into(),
                    inhale_secs: 4,
                    hold_secs: Some(4),
                    exhale_secs: 4,
                    cycles: 15,
                    approx_duration_min: 10,
                },
                ExerciseProfile {
                    id: "deep".into(),
                    name: "Deep breathing".into(),
                    description: "Relax and unwind".into(),
                    inhale_secs: 4,
                    hold_secs: None,
                    exhale_secs: 8,
                    cycles: 12,
                    approx_duration_min: 7,
                },
                ExerciseProfile {
                    id: "energy".into(),
                    name: "Energy".into(),
                    description: "Wake the body up".into(),
                    inhale_secs: 2,
                    hold_secs: None,
                    exhale_secs: 2,
                    cycles: 20,
                    approx_duration_min: 3,
                },
            ],
        }
    }

    /// Built-ins followed by `extra` profiles that validate and don't shadow
    /// an existing id. Rejected entries are logged and skipped.
    pub fn with_custom(extra: &[ExerciseProfile]) -> Self {
        let mut catalogue = Self::builtin();
        for profile in extra {
            if let Err(e) = profile.validate() {
                tracing::warn!(error = %e, "skipping custom exercise");
                continue;
            }
            if catalogue.get(&profile.id).is_some() {
                tracing::warn!(id = %profile.id, "custom exercise id already taken, skipping");
                continue;
            }
            catalogue.exercises.push(profile.clone());
        }
        catalogue
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseProfile> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseProfile> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Like [`get`](Self::get) but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&ExerciseProfile> {
        self.get(id)
            .ok_or_else(|| CoreError::UnknownExercise(id.to_string()))
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::builtin()
    }
}
