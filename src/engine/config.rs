//! Exercise rule table
//!
//! Static per-exercise configuration: rep/set/rest targets, the
//! four-threshold hysteresis band the rep counter runs on, and the
//! geometric tolerances the form checks compare against. Form
//! tolerances are fixed; only the workout targets accept per-session
//! user overrides.

use serde::{Deserialize, Serialize};

/// Minimum elapsed time between two counted repetitions, in seconds.
/// Crossings inside this window are measurement noise, not reps.
pub const REP_COOLDOWN_SECS: f64 = 0.5;

/// The supported exercise types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Exercise {
    Squat,
    BicepCurl,
    PushUp,
    PullUp,
    ForwardLunge,
}

impl Exercise {
    pub const ALL: [Exercise; 5] = [
        Exercise::Squat,
        Exercise::BicepCurl,
        Exercise::PushUp,
        Exercise::PullUp,
        Exercise::ForwardLunge,
    ];

    /// Identifier used by the JS host to select an exercise
    pub fn from_id(id: &str) -> Option<Exercise> {
        match id {
            "squat" => Some(Exercise::Squat),
            "bicepCurl" => Some(Exercise::BicepCurl),
            "pushUp" => Some(Exercise::PushUp),
            "pullUp" => Some(Exercise::PullUp),
            "forwardLunge" => Some(Exercise::ForwardLunge),
            _ => None,
        }
    }

    pub fn config(self) -> &'static ExerciseConfig {
        match self {
            Exercise::Squat => &SQUAT,
            Exercise::BicepCurl => &BICEP_CURL,
            Exercise::PushUp => &PUSH_UP,
            Exercise::PullUp => &PULL_UP,
            Exercise::ForwardLunge => &FORWARD_LUNGE,
        }
    }
}

/// Four-threshold hysteresis band over the counting metric (degrees).
///
/// The metric falls toward the loaded position and rises toward the
/// extended one. Entry thresholds switch state; the ready thresholds
/// sit strictly between them and must be crossed back through before
/// the opposite transition arms, so a metric hovering near a single
/// threshold cannot oscillate the machine.
#[derive(Clone, Copy, Debug)]
pub struct Hysteresis {
    /// Metric at or below this (down-armed) enters `Down`
    pub entry_down: f32,
    /// While `Down`, metric at or above this arms the up transition
    pub ready_up: f32,
    /// While `Up`, metric at or below this arms the down transition
    pub ready_down: f32,
    /// Metric at or above this (up-armed) enters `Up` and counts the rep
    pub entry_up: f32,
}

impl Hysteresis {
    /// Configuration invariant: entry_down < ready_up <= ready_down < entry_up
    pub fn is_ordered(&self) -> bool {
        self.entry_down < self.ready_up
            && self.ready_up <= self.ready_down
            && self.ready_down < self.entry_up
    }
}

/// Geometric form tolerances. A `None`/`false` field means the check
/// does not apply to the exercise. Distance tolerances are ratios of a
/// body-scale span, never raw pixels, so they hold at any camera
/// distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormRules {
    /// Max trunk deviation from vertical, degrees
    pub max_trunk_lean: Option<f32>,
    /// Max upper-arm (shoulder–elbow) deviation from vertical, degrees
    pub max_upper_arm_sway: Option<f32>,
    /// Knee-valgus tolerance as a ratio of the hip–ankle span
    pub valgus_ratio: Option<f32>,
    /// Chest-forward tolerance (shoulder x behind knee x) as a ratio of
    /// the shoulder–knee span; checked only in the `Down` state
    pub chest_lean_ratio: Option<f32>,
    /// Allowed shoulder–hip–knee body-line angle range, degrees
    pub body_line_range: Option<(f32, f32)>,
    /// Require the nose above mean wrist height at the top position
    pub chin_above_wrist: bool,
    /// Front-knee/front-ankle x alignment tolerance as a ratio of the
    /// front-leg hip–ankle span
    pub knee_align_ratio: Option<f32>,
}

/// Static configuration for one exercise
#[derive(Clone, Debug)]
pub struct ExerciseConfig {
    pub name: &'static str,
    pub target_reps: u32,
    pub target_sets: u32,
    /// Rest between sets, seconds
    pub rest_secs: f64,
    pub band: Hysteresis,
    pub form: FormRules,
    pub instructions: &'static [&'static str],
    pub muscles: &'static [&'static str],
}

impl ExerciseConfig {
    /// Apply per-session user overrides. Only the workout targets are
    /// adjustable; the band and form tolerances stay fixed.
    pub fn with_targets(&self, targets: &WorkoutTargets) -> ExerciseConfig {
        let mut cfg = self.clone();
        if let Some(reps) = targets.target_reps {
            cfg.target_reps = reps.max(1);
        }
        if let Some(sets) = targets.target_sets {
            cfg.target_sets = sets.max(1);
        }
        if let Some(rest) = targets.rest_secs {
            cfg.rest_secs = rest.max(0.0);
        }
        cfg
    }
}

/// User-adjustable workout targets, pushed from the dashboard
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTargets {
    pub target_reps: Option<u32>,
    pub target_sets: Option<u32>,
    pub rest_secs: Option<f64>,
}

pub static SQUAT: ExerciseConfig = ExerciseConfig {
    name: "Squat",
    target_reps: 15,
    target_sets: 3,
    rest_secs: 10.0,
    band: Hysteresis {
        entry_down: 95.0,
        ready_up: 110.0,
        ready_down: 140.0,
        entry_up: 155.0,
    },
    form: FormRules {
        max_trunk_lean: Some(45.0),
        max_upper_arm_sway: None,
        valgus_ratio: Some(0.05),
        chest_lean_ratio: Some(0.10),
        body_line_range: None,
        chin_above_wrist: false,
        knee_align_ratio: None,
    },
    instructions: &[
        "Keep your back straight, chest up",
        "Lower until thighs are at least parallel to the ground",
        "Ensure knees track over toes, not caving inward",
        "Maintain weight primarily in heels/midfoot",
    ],
    muscles: &["Quadriceps", "Hamstrings", "Glutes", "Core"],
};

pub static BICEP_CURL: ExerciseConfig = ExerciseConfig {
    name: "Bicep Curl",
    target_reps: 12,
    target_sets: 3,
    rest_secs: 10.0,
    band: Hysteresis {
        entry_down: 70.0,
        ready_up: 90.0,
        ready_down: 120.0,
        entry_up: 140.0,
    },
    form: FormRules {
        max_trunk_lean: Some(20.0),
        max_upper_arm_sway: Some(25.0),
        valgus_ratio: None,
        chest_lean_ratio: None,
        body_line_range: None,
        chin_above_wrist: false,
        knee_align_ratio: None,
    },
    instructions: &[
        "Keep elbows tucked close to your sides",
        "Minimize upper arm movement; isolate the bicep",
        "Curl weight up towards shoulder",
        "Lower weight slowly until arms are nearly straight",
    ],
    muscles: &["Biceps", "Forearms"],
};

pub static PUSH_UP: ExerciseConfig = ExerciseConfig {
    name: "Push Up",
    target_reps: 15,
    target_sets: 3,
    rest_secs: 10.0,
    band: Hysteresis {
        entry_down: 100.0,
        ready_up: 115.0,
        ready_down: 140.0,
        entry_up: 155.0,
    },
    form: FormRules {
        max_trunk_lean: None,
        max_upper_arm_sway: None,
        valgus_ratio: None,
        chest_lean_ratio: None,
        body_line_range: Some((150.0, 190.0)),
        chin_above_wrist: false,
        knee_align_ratio: None,
    },
    instructions: &[
        "Place hands slightly wider than shoulder-width",
        "Keep body in a straight line from head to heels",
        "Lower chest towards the floor",
        "Push back up until arms are extended",
    ],
    muscles: &["Chest", "Shoulders", "Triceps", "Core"],
};

pub static PULL_UP: ExerciseConfig = ExerciseConfig {
    name: "Pull Up",
    target_reps: 15,
    target_sets: 3,
    rest_secs: 10.0,
    band: Hysteresis {
        entry_down: 95.0,
        ready_up: 110.0,
        ready_down: 140.0,
        entry_up: 160.0,
    },
    form: FormRules {
        max_trunk_lean: None,
        max_upper_arm_sway: None,
        valgus_ratio: None,
        chest_lean_ratio: None,
        body_line_range: None,
        chin_above_wrist: true,
        knee_align_ratio: None,
    },
    instructions: &[
        "Grip bar slightly wider than shoulder-width, palms facing away",
        "Hang with arms fully extended",
        "Pull body up until chin is above the bar",
        "Lower body slowly until arms are fully extended",
        "Avoid excessive swinging or kipping",
    ],
    muscles: &["Back (Lats)", "Biceps", "Shoulders", "Core"],
};

pub static FORWARD_LUNGE: ExerciseConfig = ExerciseConfig {
    name: "Forward Lunge",
    target_reps: 15,
    target_sets: 3,
    rest_secs: 10.0,
    band: Hysteresis {
        entry_down: 100.0,
        ready_up: 115.0,
        ready_down: 140.0,
        entry_up: 155.0,
    },
    form: FormRules {
        max_trunk_lean: Some(25.0),
        max_upper_arm_sway: None,
        valgus_ratio: None,
        chest_lean_ratio: None,
        body_line_range: None,
        chin_above_wrist: false,
        knee_align_ratio: Some(0.25),
    },
    instructions: &[
        "Step forward into a lunge position",
        "Lower until back knee nearly touches ground",
        "Keep front knee aligned over ankle",
        "Maintain upright torso position",
        "Push through front heel to return to start",
        "Alternate legs with each rep",
    ],
    muscles: &["Quadriceps", "Hamstrings", "Glutes", "Core", "Hip Flexors"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_band_is_ordered() {
        for ex in Exercise::ALL {
            assert!(
                ex.config().band.is_ordered(),
                "hysteresis band out of order for {:?}",
                ex
            );
        }
    }

    #[test]
    fn ids_round_trip() {
        assert_eq!(Exercise::from_id("squat"), Some(Exercise::Squat));
        assert_eq!(Exercise::from_id("bicepCurl"), Some(Exercise::BicepCurl));
        assert_eq!(Exercise::from_id("handstand"), None);
    }

    #[test]
    fn overrides_touch_only_workout_targets() {
        let targets = WorkoutTargets {
            target_reps: Some(5),
            target_sets: Some(2),
            rest_secs: Some(30.0),
        };
        let cfg = SQUAT.with_targets(&targets);
        assert_eq!(cfg.target_reps, 5);
        assert_eq!(cfg.target_sets, 2);
        assert_eq!(cfg.rest_secs, 30.0);
        // Band and form tolerances are not user-adjustable
        assert_eq!(cfg.band.entry_down, SQUAT.band.entry_down);
        assert_eq!(cfg.form.max_trunk_lean, SQUAT.form.max_trunk_lean);
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        let cfg = BICEP_CURL.with_targets(&WorkoutTargets::default());
        assert_eq!(cfg.target_reps, 12);
        assert_eq!(cfg.target_sets, 3);
    }
}
